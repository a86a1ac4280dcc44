use super::error::{MemError, Result};

/// Simulated time, in nanoseconds.
pub type Time = u64;

/// A bus data word. Wide enough for any bus up to 128 bits; only the low
/// `data_width` bits are ever populated.
pub type Word = u128;

/// Static configuration of a memory responder.
#[derive(Clone, Copy, Debug)]
pub struct MemorySpec {             // unit         reasonable defaults
    pub data_width: u32,            // bits         32
    pub error_noninit: bool,        // -            true
    pub rand_noninit: bool,         // -            true
    pub response_delay: (Time, Time), // ns, incl.  (0, 0)
}

impl Default for MemorySpec {
    fn default() -> Self {
        MemorySpec {
            data_width: 32,
            error_noninit: true,
            rand_noninit: true,
            response_delay: (0, 0),
        }
    }
}

impl MemorySpec {
    pub fn byte_width(&self) -> u32 {
        (self.data_width + 7) / 8
    }
    pub fn mask(&self) -> Word {
        if self.data_width >= Word::BITS {
            Word::MAX
        } else {
            (1 << self.data_width) - 1
        }
    }
    pub fn validate(&self) -> Result<()> {
        if self.data_width == 0 || self.data_width % 8 != 0 {
            return Err(MemError::InvalidConfig("data width must be a non-zero multiple of 8"));
        }
        if self.data_width > Word::BITS {
            return Err(MemError::InvalidConfig("data width must not exceed 128 bits"));
        }
        let (min, max) = self.response_delay;
        if min > max {
            return Err(MemError::InvalidConfig("response delay range is empty"));
        }
        Ok(())
    }
}

pub mod timing {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::{MemorySpec, Time};

    /// derive an independent, reproducible generator from a parent stream
    pub fn fork<G: Rng + ?Sized>(parent: &mut G) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(parent.gen())
    }
    /// draw a delivery time for a response produced at `now`
    pub fn deliver_at<G: Rng + ?Sized>(spec: &MemorySpec, rng: &mut G, now: Time) -> Time {
        let (min, max) = spec.response_delay;
        now.saturating_add(rng.gen_range(min..=max))
    }
}

/// Address progression across the beats of a burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Burst {
    Fixed,
    Incr,
    Wrap,
}

impl Burst {
    /// Decode the two-bit AxBURST field.
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0b00 => Ok(Burst::Fixed),
            0b01 => Ok(Burst::Incr),
            0b10 => Ok(Burst::Wrap),
            other => Err(MemError::UnknownBurstType(other)),
        }
    }
    pub fn bits(&self) -> u8 {
        match self {
            Burst::Fixed => 0b00,
            Burst::Incr => 0b01,
            Burst::Wrap => 0b10,
        }
    }
}

// CAPTURED REQUESTS

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAddress {
    pub id: u32,
    pub address: u64,
    pub length: u8,     // beats - 1
    pub burst: Burst,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteData {
    pub data: Word,
    pub strobe: u16,
    pub last: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadAddress {
    pub id: u32,
    pub address: u64,
    pub length: u8,     // beats - 1
    pub burst: Burst,
}

/// Anything a monitor can capture on the AW, W or AR channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Captured {
    WriteAddress(WriteAddress),
    WriteData(WriteData),
    ReadAddress(ReadAddress),
}

impl From<WriteAddress> for Captured {
    fn from(aw: WriteAddress) -> Self { Captured::WriteAddress(aw) }
}

impl From<WriteData> for Captured {
    fn from(w: WriteData) -> Self { Captured::WriteData(w) }
}

impl From<ReadAddress> for Captured {
    fn from(ar: ReadAddress) -> Self { Captured::ReadAddress(ar) }
}

// RESPONSES

/// B channel response. `id` is `None` on AXI4-Lite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteResponse {
    pub id: Option<u32>,
    pub deliver_at: Time,
}

/// R channel beat. `id` is `None` on AXI4-Lite, where `last` is always set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadResponse {
    pub id: Option<u32>,
    pub data: Word,
    pub last: bool,
    pub deliver_at: Time,
}

/// Records that carry a delivery timestamp.
pub trait Timed {
    fn deliver_at(&self) -> Time;
}

impl Timed for WriteResponse {
    fn deliver_at(&self) -> Time { self.deliver_at }
}

impl Timed for ReadResponse {
    fn deliver_at(&self) -> Time { self.deliver_at }
}

/// The receiving end of a response channel. The initiator owns timed delivery
/// of everything enqueued here.
pub trait Initiator<T> {
    fn enqueue(&mut self, rsp: T);
}

impl<T> Initiator<T> for Vec<T> {
    fn enqueue(&mut self, rsp: T) {
        self.push(rsp);
    }
}
