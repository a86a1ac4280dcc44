// Wraps the responders into asynchronix models. Monitors send captured
// transactions to `on_capture`; responses leave through the `o_wrsp` and
// `o_rrsp` outputs at their delivery time.

use std::time::Duration;

use asynchronix::model::{Model, Output};
use asynchronix::time::{MonotonicTime, Scheduler};
use log::error;

use super::axi4::Axi4Memory;
use super::common::*;
use super::error::Result;
use super::lite::{Axi4LiteMemory, LiteCaptured};
use super::memory::MemoryStore;
use crate::delayed_q::DeliveryQueue;

/// nanoseconds elapsed since the simulation epoch
fn sim_ns(t: MonotonicTime) -> Time {
    t.as_secs() as u64 * 1_000_000_000 + t.subsec_nanos() as u64
}

fn sim_time(ns: Time) -> MonotonicTime {
    MonotonicTime::EPOCH + Duration::from_nanos(ns)
}

// any responder that holds its responses until they fall due can be driven
// by ResponderModel
pub trait Responder: Send + 'static {
    type Request: Clone + Send + 'static;
    fn handle(&mut self, now: Time, obj: Self::Request) -> Result<()>;
    /// responses due at or before `now`, each channel in production order
    fn release(&mut self, now: Time) -> (Vec<WriteResponse>, Vec<ReadResponse>);
    /// earliest time at which either channel has something to release
    fn next_deadline(&self) -> Option<Time>;
    fn memory(&self) -> &MemoryStore;
}

type WriteQueue = DeliveryQueue<WriteResponse>;
type ReadQueue = DeliveryQueue<ReadResponse>;

fn earliest(a: Option<Time>, b: Option<Time>) -> Option<Time> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Responder for Axi4Memory<WriteQueue, ReadQueue> {
    type Request = Captured;
    fn handle(&mut self, now: Time, obj: Captured) -> Result<()> {
        Axi4Memory::handle(self, now, obj)
    }
    fn release(&mut self, now: Time) -> (Vec<WriteResponse>, Vec<ReadResponse>) {
        (self.brsp.release(now), self.rrsp.release(now))
    }
    fn next_deadline(&self) -> Option<Time> {
        earliest(self.brsp.next_deadline(), self.rrsp.next_deadline())
    }
    fn memory(&self) -> &MemoryStore {
        Axi4Memory::memory(self)
    }
}

impl Responder for Axi4LiteMemory<WriteQueue, ReadQueue> {
    type Request = LiteCaptured;
    fn handle(&mut self, now: Time, obj: LiteCaptured) -> Result<()> {
        Axi4LiteMemory::handle(self, now, obj)
    }
    fn release(&mut self, now: Time) -> (Vec<WriteResponse>, Vec<ReadResponse>) {
        (self.brsp.release(now), self.rrsp.release(now))
    }
    fn next_deadline(&self) -> Option<Time> {
        earliest(self.brsp.next_deadline(), self.rrsp.next_deadline())
    }
    fn memory(&self) -> &MemoryStore {
        Axi4LiteMemory::memory(self)
    }
}

pub struct ResponderModel<M: Responder> {
    inner: M,
    wake_at: Option<Time>,  // pending _on_release wake-up
    pub o_wrsp: Output<WriteResponse>,
    pub o_rrsp: Output<ReadResponse>,
}

pub type MemoryModel = ResponderModel<Axi4Memory<WriteQueue, ReadQueue>>;
pub type LiteMemoryModel = ResponderModel<Axi4LiteMemory<WriteQueue, ReadQueue>>;

impl MemoryModel {
    pub fn with_seed(spec: MemorySpec, seed: u64) -> Result<Self> {
        Ok(Self::new(Axi4Memory::with_seed(spec, seed, DeliveryQueue::new(), DeliveryQueue::new())?))
    }
}

impl LiteMemoryModel {
    pub fn with_seed(spec: MemorySpec, seed: u64) -> Result<Self> {
        Ok(Self::new(Axi4LiteMemory::with_seed(spec, seed, DeliveryQueue::new(), DeliveryQueue::new())?))
    }
}

impl<M: Responder> ResponderModel<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            wake_at: None,
            o_wrsp: Output::new(),
            o_rrsp: Output::new(),
        }
    }
    pub fn memory(&self) -> &MemoryStore {
        self.inner.memory()
    }

    /// send everything that has fallen due, then wake up again at the next deadline
    fn deliver<'a>(
        &'a mut self,
        scheduler: &'a Scheduler<Self>,
    ) -> impl std::future::Future<Output = ()> + Send + 'a {
        async move {
            let now = sim_ns(scheduler.time());
            let (wrsps, rrsps) = self.inner.release(now);
            for rsp in wrsps {
                self.o_wrsp.send(rsp).await;
            }
            for rsp in rrsps {
                self.o_rrsp.send(rsp).await;
            }
            // whatever is left lies strictly after now
            let pending = self.wake_at.filter(|&w| w > now);
            if let Some(t) = self.inner.next_deadline() {
                if pending.map_or(true, |w| t < w) {
                    scheduler
                        .schedule_event(sim_time(t), Self::_on_release, ())
                        .expect("next deadline lies in the future");
                    self.wake_at = Some(t);
                }
            }
        }
    }

    //  inputs (internal inputs are prefixed with _)

    async fn _on_release(&mut self, _: (), scheduler: &Scheduler<Self>) {
        self.deliver(scheduler).await;
    }
    pub async fn on_capture(&mut self, obj: M::Request, scheduler: &Scheduler<Self>) {
        let now = sim_ns(scheduler.time());
        if let Err(e) = self.inner.handle(now, obj) {
            error!("memory model failed at {} ns: {}", now, e);
            panic!("memory model failed: {}", e);
        }
        self.deliver(scheduler).await;
    }
}

impl<M: Responder> Model for ResponderModel<M> {}
