//! Priority Scheduler - ordered queue of pending batch dispatches
//!
//! Ordering key, compared lexicographically:
//! 1. priority rank (`HIGH` < `MEDIUM` < `LOW`)
//! 2. job `created_at` (earlier first)
//! 3. insertion sequence (earlier first)
//!
//! The sequence number is unique per entry, which makes the ordering total.

use crate::domain::{BatchId, Priority};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A batch waiting to be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBatch {
    pub batch_id: BatchId,
    pub priority: Priority,
    pub created_at: i64,
    seq: u64,
}

impl PendingBatch {
    fn key(&self) -> (u8, i64, u64) {
        (self.priority.rank(), self.created_at, self.seq)
    }
}

impl Ord for PendingBatch {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest key pops first
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for PendingBatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct QueueState {
    heap: BinaryHeap<PendingBatch>,
    next_seq: u64,
}

/// Pending-work queue shared by the ingest path and the dispatcher
#[derive(Default)]
pub struct PriorityScheduler {
    state: Mutex<QueueState>,
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a pending batch
    pub fn enqueue(&self, batch_id: impl Into<BatchId>, priority: Priority, created_at: i64) {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        let entry = PendingBatch {
            batch_id: batch_id.into(),
            priority,
            created_at,
            seq,
        };
        debug!(
            batch_id = %entry.batch_id,
            priority = %priority,
            created_at = created_at,
            "Batch enqueued"
        );
        state.heap.push(entry);
    }

    /// Remove and return the next batch to dispatch
    pub fn dequeue(&self) -> Option<PendingBatch> {
        self.lock().heap.pop()
    }

    /// Number of pending (not yet dispatched) batches
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().heap.is_empty()
    }

    /// Pending counts per priority, in priority order
    pub fn pending_by_priority(&self) -> Vec<(Priority, usize)> {
        let state = self.lock();
        Priority::ALL
            .iter()
            .map(|p| (*p, state.heap.iter().filter(|e| e.priority == *p).count()))
            .collect()
    }
}
