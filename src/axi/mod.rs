mod axi4;
mod common;
mod error;
mod lite;
mod memory;
mod model;

pub use axi4::Axi4Memory;
pub use common::*;
pub use error::{MemError, Result};
pub use lite::*;
pub use memory::{bit_strobe, MemoryStore, StrobeMasks};
pub use model::{LiteMemoryModel, MemoryModel, Responder, ResponderModel};
