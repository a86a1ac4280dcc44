use thiserror::Error;

use super::common::Burst;

pub type Result<T> = std::result::Result<T, MemError>;

/// Fatal memory model errors. None of these are recoverable: they mean either
/// the device under test broke a protocol assumption or the model hit one of
/// its own limits, and the enclosing test should stop.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemError {
    #[error("read from uninitialised address: 0x{address:016X}")]
    UninitializedAccess { address: u64 },

    #[error("unsupported {burst:?} burst of {beats} beats")]
    UnsupportedBurst { burst: Burst, beats: u32 },

    #[error("unknown burst type encoding 0b{0:02b}")]
    UnknownBurstType(u8),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
