use std::collections::VecDeque;

use log::{debug, trace, warn};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::common::*;
use super::error::{MemError, Result};
use super::memory::MemoryStore;

/// AXI4 memory responder.
///
/// AW and W captures are queued separately. A burst commits once an address
/// is queued *and* at least one `last`-terminated run of data beats is
/// waiting, and produces exactly one B response. AR captures are expanded
/// straight away into `length + 1` R beats.
///
/// The responder is driven through `&mut self`, so the borrow checker rules
/// out the handler being re-entered while an event is being processed.
pub struct Axi4Memory<B, R> {
    spec: MemorySpec,
    memory: MemoryStore,
    rng: ChaCha8Rng,
    q_awreq: VecDeque<WriteAddress>,
    q_wreq: VecDeque<WriteData>,
    wlast_count: usize,     // complete W bursts waiting in q_wreq
    pub brsp: B,
    pub rrsp: R,
}

impl<B, R> Axi4Memory<B, R>
where
    B: Initiator<WriteResponse>,
    R: Initiator<ReadResponse>,
{
    /// Create a responder whose random streams are forked from `rng`.
    pub fn new<G: Rng + ?Sized>(spec: MemorySpec, rng: &mut G, brsp: B, rrsp: R) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            memory: MemoryStore::new(spec, timing::fork(rng)),
            rng: timing::fork(rng),
            q_awreq: VecDeque::new(),
            q_wreq: VecDeque::new(),
            wlast_count: 0,
            brsp,
            rrsp,
        })
    }

    pub fn with_seed(spec: MemorySpec, seed: u64, brsp: B, rrsp: R) -> Result<Self> {
        Self::new(spec, &mut ChaCha8Rng::seed_from_u64(seed), brsp, rrsp)
    }

    pub fn spec(&self) -> &MemorySpec {
        &self.spec
    }
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }
    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.memory
    }
    /// write addresses not yet matched with data
    pub fn pending_writes(&self) -> usize {
        self.q_awreq.len()
    }
    /// data beats not yet committed
    pub fn pending_beats(&self) -> usize {
        self.q_wreq.len()
    }

    /// Handle one captured transaction at simulated time `now`.
    pub fn handle(&mut self, now: Time, obj: Captured) -> Result<()> {
        // queue AW/W requests, immediately respond to AR requests
        match obj {
            Captured::WriteAddress(aw) => {
                debug!("AW id={} addr=0x{:X} len={} burst=0b{:02b}", aw.id, aw.address, aw.length, aw.burst.bits());
                self.q_awreq.push_back(aw);
            }
            Captured::WriteData(w) => {
                debug!("W data=0x{:X} strb=0b{:b} last={}", w.data, w.strobe, w.last);
                if w.last {
                    self.wlast_count += 1;
                }
                self.q_wreq.push_back(w);
            }
            Captured::ReadAddress(ar) => {
                debug!("AR id={} addr=0x{:X} len={} burst=0b{:02b}", ar.id, ar.address, ar.length, ar.burst.bits());
                self.respond_read(now, &ar)?;
            }
        }
        // drain every burst that has both halves available
        while self.commit_write(now)? {}
        Ok(())
    }

    fn respond_read(&mut self, now: Time, ar: &ReadAddress) -> Result<()> {
        // TODO: wrapping and fixed read bursts
        if ar.length > 0 && ar.burst != Burst::Incr {
            return Err(MemError::UnsupportedBurst { burst: ar.burst, beats: ar.length as u32 + 1 });
        }
        let stride = self.spec.byte_width() as u64;
        for i in 0..=ar.length {
            let address = ar.address.wrapping_add(i as u64 * stride);
            let rsp = ReadResponse {
                id: Some(ar.id),
                data: self.memory.read(address, true)?,
                last: i == ar.length,
                deliver_at: timing::deliver_at(&self.spec, &mut self.rng, now),
            };
            trace!("R id={} data=0x{:X} last={} @{}", ar.id, rsp.data, rsp.last, rsp.deliver_at);
            self.rrsp.enqueue(rsp);
        }
        Ok(())
    }

    /// Commit the oldest write burst if both halves have arrived. Returns
    /// whether a burst was committed.
    fn commit_write(&mut self, now: Time) -> Result<bool> {
        if self.wlast_count == 0 {
            return Ok(false);
        }
        let Some(awreq) = self.q_awreq.pop_front() else {
            return Ok(false);
        };
        // checked before any beat is written so a rejected burst leaves memory untouched
        if awreq.burst == Burst::Wrap {
            let err = MemError::UnsupportedBurst { burst: awreq.burst, beats: awreq.length as u32 + 1 };
            self.q_awreq.push_front(awreq);
            return Err(err);
        }
        self.wlast_count -= 1;

        let stride = self.spec.byte_width() as u64;
        let mut address = awreq.address;
        let mut beats = 0u32;
        while let Some(wreq) = self.q_wreq.pop_front() {
            trace!("commit 0x{:016X} <- 0x{:X} strb=0b{:b}", address, wreq.data, wreq.strobe);
            self.memory.write(address, wreq.data, wreq.strobe);
            beats += 1;
            if wreq.last {
                break;
            }
            if awreq.burst == Burst::Incr {
                address = address.wrapping_add(stride);
            }
        }
        if beats != awreq.length as u32 + 1 {
            warn!(
                "AW id={} announced {} beats but W burst carried {}",
                awreq.id, awreq.length as u32 + 1, beats
            );
        }

        let rsp = WriteResponse {
            id: Some(awreq.id),
            deliver_at: timing::deliver_at(&self.spec, &mut self.rng, now),
        };
        trace!("B id={} @{}", awreq.id, rsp.deliver_at);
        self.brsp.enqueue(rsp);
        Ok(true)
    }
}
