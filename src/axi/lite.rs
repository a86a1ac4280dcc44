use std::collections::VecDeque;

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::common::*;
use super::error::Result;
use super::memory::MemoryStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteWriteAddress {
    pub address: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteWriteData {
    pub data: Word,
    pub strobe: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteReadAddress {
    pub address: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LiteCaptured {
    WriteAddress(LiteWriteAddress),
    WriteData(LiteWriteData),
    ReadAddress(LiteReadAddress),
}

impl From<LiteWriteAddress> for LiteCaptured {
    fn from(aw: LiteWriteAddress) -> Self { LiteCaptured::WriteAddress(aw) }
}

impl From<LiteWriteData> for LiteCaptured {
    fn from(w: LiteWriteData) -> Self { LiteCaptured::WriteData(w) }
}

impl From<LiteReadAddress> for LiteCaptured {
    fn from(ar: LiteReadAddress) -> Self { LiteCaptured::ReadAddress(ar) }
}

/// AXI4-Lite memory responder: every transaction is a single beat, so each
/// queued address pairs with exactly one queued data beat.
pub struct Axi4LiteMemory<B, R> {
    spec: MemorySpec,
    memory: MemoryStore,
    rng: ChaCha8Rng,
    q_awreq: VecDeque<LiteWriteAddress>,
    q_wreq: VecDeque<LiteWriteData>,
    pub brsp: B,
    pub rrsp: R,
}

impl<B, R> Axi4LiteMemory<B, R>
where
    B: Initiator<WriteResponse>,
    R: Initiator<ReadResponse>,
{
    pub fn new<G: Rng + ?Sized>(spec: MemorySpec, rng: &mut G, brsp: B, rrsp: R) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            memory: MemoryStore::new(spec, timing::fork(rng)),
            rng: timing::fork(rng),
            q_awreq: VecDeque::new(),
            q_wreq: VecDeque::new(),
            brsp,
            rrsp,
        })
    }

    pub fn with_seed(spec: MemorySpec, seed: u64, brsp: B, rrsp: R) -> Result<Self> {
        Self::new(spec, &mut ChaCha8Rng::seed_from_u64(seed), brsp, rrsp)
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }
    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.memory
    }
    pub fn pending_writes(&self) -> usize {
        self.q_awreq.len()
    }
    pub fn pending_beats(&self) -> usize {
        self.q_wreq.len()
    }

    fn pop_matched(&mut self) -> Option<(LiteWriteAddress, LiteWriteData)> {
        if self.q_awreq.is_empty() || self.q_wreq.is_empty() {
            return None;
        }
        Some((self.q_awreq.pop_front()?, self.q_wreq.pop_front()?))
    }

    pub fn handle(&mut self, now: Time, obj: LiteCaptured) -> Result<()> {
        match obj {
            LiteCaptured::WriteAddress(aw) => {
                debug!("AW addr=0x{:X}", aw.address);
                self.q_awreq.push_back(aw);
            }
            LiteCaptured::WriteData(w) => {
                debug!("W data=0x{:X} strb=0b{:b}", w.data, w.strobe);
                self.q_wreq.push_back(w);
            }
            LiteCaptured::ReadAddress(ar) => {
                debug!("AR addr=0x{:X}", ar.address);
                let rsp = ReadResponse {
                    id: None,
                    data: self.memory.read(ar.address, true)?,
                    last: true,
                    deliver_at: timing::deliver_at(&self.spec, &mut self.rng, now),
                };
                trace!("R data=0x{:X} @{}", rsp.data, rsp.deliver_at);
                self.rrsp.enqueue(rsp);
            }
        }
        while let Some((awreq, wreq)) = self.pop_matched() {
            self.memory.write(awreq.address, wreq.data, wreq.strobe);
            let rsp = WriteResponse {
                id: None,
                deliver_at: timing::deliver_at(&self.spec, &mut self.rng, now),
            };
            trace!("B @{}", rsp.deliver_at);
            self.brsp.enqueue(rsp);
        }
        Ok(())
    }
}
