//! Frame coalescing and delayed actions.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

/// Coalesces any number of scroll events into one pending frame
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame; false if one is already pending
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending frame, if any
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Actions due at a deadline; FIFO among equal deadlines
#[derive(Debug)]
pub struct DelayQueue<A> {
    entries: BTreeMap<(Instant, u64), A>,
    seq: u64,
}

impl<A> Default for DelayQueue<A> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            seq: 0,
        }
    }
}

impl<A> DelayQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) {
        self.entries.insert((now + delay, self.seq), action);
        self.seq += 1;
    }

    /// Remove and return every action due at `now`, in due order
    pub fn drain_due(&mut self, now: Instant) -> Vec<A> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            if entry.key().0 > now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.keys().next().map(|(at, _)| *at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
