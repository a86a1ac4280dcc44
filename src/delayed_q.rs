// implements a per-channel response queue with timed delivery

use std::collections::VecDeque;

use crate::axi::{Initiator, Time, Timed};

/*
    a channel hands responses back strictly in the order they were produced.
    a response whose own deliver_at is earlier than that of a response queued
    before it is held back until the earlier one leaves, so each entry is keyed
    on max(deliver_at, release time of its predecessor). the keys are then
    non-decreasing and a plain FIFO releases in time order.
 */

struct TimedMsg<MsgType> {
    t: Time,
    msg: MsgType,
}

/// Holds responses until their delivery time, releasing them in order.
pub struct DeliveryQueue<MsgType> {
    q: VecDeque<TimedMsg<MsgType>>,
    horizon: Time,  // release time of the most recently queued response
}

impl<MsgType> Default for DeliveryQueue<MsgType> {
    fn default() -> Self {
        Self::new()
    }
}

impl<MsgType> DeliveryQueue<MsgType> {
    pub fn new() -> Self {
        DeliveryQueue {
            q: VecDeque::new(),
            horizon: 0,
        }
    }
    pub fn len(&self) -> usize {
        self.q.len()
    }
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
    /// time at which the oldest held response falls due
    pub fn next_deadline(&self) -> Option<Time> {
        self.q.front().map(|msg| msg.t)
    }
    pub fn try_fetch(&mut self, now: Time) -> Option<MsgType> {
        if self.q.front()?.t <= now {
            self.q.pop_front().map(|msg| msg.msg)
        } else {
            None
        }
    }
    /// everything due at or before `now`, in the order it was queued
    pub fn release(&mut self, now: Time) -> Vec<MsgType> {
        let mut due = Vec::new();
        while let Some(msg) = self.try_fetch(now) {
            due.push(msg);
        }
        due
    }
}

impl<MsgType: Timed> Initiator<MsgType> for DeliveryQueue<MsgType> {
    fn enqueue(&mut self, rsp: MsgType) {
        let t = rsp.deliver_at().max(self.horizon);
        self.horizon = t;
        self.q.push_back(TimedMsg { t, msg: rsp });
    }
}
