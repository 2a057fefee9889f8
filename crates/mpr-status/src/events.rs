//! Bounded log of status transitions
//!
//! Cells push every effective change here; consumers (e.g. code informing
//! subscribers) drain it. The queue is lock-free and never blocks writers:
//! when it is full the oldest entry is evicted and counted as dropped.
//!
//! A cell records its change after the update has landed, so entries from
//! concurrent writers on the same cell may appear in a different order than
//! the word actually went through. Each entry's `from`/`to` pair is exact;
//! the order between entries is not causal.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_queue::ArrayQueue;

use crate::bits::StatusBits;

/// One status change of a single object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StatusBits,
    pub to: StatusBits,
}

impl Transition {
    pub const fn new(from: StatusBits, to: StatusBits) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Lock-free FIFO of transitions with evict-oldest overflow
pub struct TransitionLog {
    queue: ArrayQueue<Transition>,
    dropped: AtomicU64,
}

impl TransitionLog {
    /// Create a log holding at most `capacity` transitions (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            dropped: AtomicU64::new(0),
        }
    }

    /// Append a transition, evicting the oldest one if full
    pub fn record(&self, transition: Transition) {
        if self.queue.force_push(transition).is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove the oldest transition
    pub fn pop(&self) -> Option<Transition> {
        self.queue.pop()
    }

    /// Remove all transitions, oldest first
    pub fn drain(&self) -> Vec<Transition> {
        let mut out = Vec::with_capacity(self.queue.len());
        while let Some(t) = self.queue.pop() {
            out.push(t);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of transitions evicted because the log was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for TransitionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("dropped", &self.dropped())
            .finish()
    }
}
