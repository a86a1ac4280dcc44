use std::collections::HashMap;

use log::trace;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::common::*;
use super::error::{MemError, Result};

/// expand a byte strobe into a bit mask, one 0xFF lane per set strobe bit.
/// strobe bits beyond `byte_width` are ignored.
pub fn bit_strobe(byte_strobe: u16, byte_width: u32) -> Word {
    (0..byte_width.min(16))
        .filter(|i| (byte_strobe >> i) & 0x1 == 1)
        .fold(0, |mask, i| mask | (0xFF << (i * 8)))
}

/// memoised `bit_strobe` for a fixed byte width
pub struct StrobeMasks {
    byte_width: u32,
    cache: HashMap<u16, Word>,
}

impl StrobeMasks {
    pub fn new(byte_width: u32) -> Self {
        Self { byte_width, cache: HashMap::new() }
    }
    pub fn get(&mut self, byte_strobe: u16) -> Word {
        let byte_width = self.byte_width;
        *self.cache
            .entry(byte_strobe)
            .or_insert_with(|| bit_strobe(byte_strobe, byte_width))
    }
}

/// Sparse word-addressed backing store.
///
/// Cells spring into existence on first access. What an untouched cell holds
/// depends on the `MemorySpec`: `error_noninit` makes checked reads fail, otherwise
/// `rand_noninit` fills it with random bits and anything else fills it with
/// zero. Once filled a cell keeps its value until written.
pub struct MemoryStore {
    spec: MemorySpec,
    mask: Word,
    cells: HashMap<u64, Word>,
    strobes: StrobeMasks,
    rng: ChaCha8Rng,
}

impl MemoryStore {
    pub fn new(spec: MemorySpec, rng: ChaCha8Rng) -> Self {
        Self {
            spec,
            mask: spec.mask(),
            cells: HashMap::new(),
            strobes: StrobeMasks::new(spec.byte_width()),
            rng,
        }
    }

    fn fill(&mut self, address: u64) -> Word {
        let (rng, mask, randomise) = (&mut self.rng, self.mask, self.spec.rand_noninit);
        *self.cells.entry(address).or_insert_with(|| {
            let word = if randomise {
                rng.gen::<Word>() & mask
            } else {
                0
            };
            trace!("filled uninitialised 0x{:016X} with 0x{:X}", address, word);
            word
        })
    }

    pub fn read(&mut self, address: u64, check: bool) -> Result<Word> {
        if check && self.spec.error_noninit && !self.cells.contains_key(&address) {
            return Err(MemError::UninitializedAccess { address });
        }
        Ok(self.fill(address))
    }

    pub fn write(&mut self, address: u64, data: Word, strobe: u16) {
        // partial writes to fresh memory merge with the fill value, never fail
        let current = self.fill(address);
        let bit_strobe = self.strobes.get(strobe);
        let value = if bit_strobe == self.mask {
            data & self.mask
        } else {
            (data & bit_strobe) | (current & (self.mask ^ bit_strobe))
        };
        self.cells.insert(address, value);
    }

    /// current contents without filling
    pub fn peek(&self, address: u64) -> Option<Word> {
        self.cells.get(&address).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
