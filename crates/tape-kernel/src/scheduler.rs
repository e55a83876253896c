//! Timestamp-ordered event scheduler.
//!
//! # Ordering key
//!
//! `(logical_time ASC, kind precedence ASC, insertion seq ASC)`.
//!
//! Kind precedence is the fixed total order Observation < Intent <
//! Order < Fill: at a shared logical_time every Observation dispatches
//! before any Intent, every Intent before any Order, every Order before
//! any Fill. This is the single most important correctness property of
//! the whole system — reordering it reorders cause and effect (a risk
//! check reading stale equity, a fill invisible to a same-tick check).
//!
//! The insertion sequence is a monotonic counter assigned at `schedule`
//! time and only breaks exact (time, kind) ties, giving stable FIFO
//! order within a class.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tape_events::Event;

/// Scheduler error variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    /// `pop()` on a drained queue. Programmer error: a correctly driven
    /// run loop checks `is_empty()` (or stops on this) before popping.
    EmptyQueue,
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::EmptyQueue => write!(f, "pop() on an empty scheduler"),
        }
    }
}

impl std::error::Error for SchedulerError {}

/// Heap entry. Ordering is inverted so `BinaryHeap` (a max-heap) pops
/// the globally-earliest key first.
struct Scheduled {
    logical_time: i64,
    precedence: u8,
    seq: u64,
    event: Event,
}

impl Scheduled {
    fn key(&self) -> (i64, u8, u64) {
        (self.logical_time, self.precedence, self.seq)
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        // seq is unique per entry, so distinct entries never compare equal
        self.key() == other.key()
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // inverted: smallest key = greatest heap element
        other.key().cmp(&self.key())
    }
}

/// Priority queue over events with the deterministic ordering key.
pub struct Scheduler {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Insert an event. The insertion sequence number is assigned here.
    pub fn schedule(&mut self, event: Event) {
        let entry = Scheduled {
            logical_time: event.logical_time(),
            precedence: event.kind().precedence(),
            seq: self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    /// Remove and return the globally-earliest event.
    pub fn pop(&mut self) -> Result<Event, SchedulerError> {
        self.heap
            .pop()
            .map(|s| s.event)
            .ok_or(SchedulerError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
