//! Priority work queue feeding the dispatcher
//!
//! Jobs are released in (priority rank, enqueue time, ordinal, sequence)
//! order: strict priority first, FIFO within a priority, submission order
//! within one ingestion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{BatchId, IngestionId, Priority};

/// A unit of scheduled work: one batch of one ingestion. Immutable once
/// enqueued.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub ingestion_id: IngestionId,
    pub batch_id: BatchId,
    /// Position of the batch within its ingestion; tie-break for jobs from
    /// the same submission.
    pub ordinal: u32,
    pub priority: Priority,
    /// Monotonic enqueue timestamp; FIFO tie-break across submissions.
    pub enqueued_at: Instant,
    /// Queue-assigned counter, the final tie-break. Keeps the order total
    /// even when enqueue timestamps collide.
    seq: u64,
}

impl BatchJob {
    /// Create a job for one batch. The queue assigns `seq` at push time.
    pub fn new(
        ingestion_id: IngestionId,
        batch_id: BatchId,
        ordinal: u32,
        priority: Priority,
    ) -> Self {
        Self {
            ingestion_id,
            batch_id,
            ordinal,
            priority,
            enqueued_at: Instant::now(),
            seq: 0,
        }
    }

    fn key(&self) -> (u8, Instant, u32, u64) {
        (self.priority.rank(), self.enqueued_at, self.ordinal, self.seq)
    }
}

impl Eq for BatchJob {}

impl PartialEq for BatchJob {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Ord for BatchJob {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; the job with the smallest key must
        // compare greatest so it pops first.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for BatchJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unbounded priority queue shared between submitters and the single
/// dispatcher. Push never blocks; pop suspends until a job is available.
pub struct WorkQueue {
    heap: Mutex<BinaryHeap<BatchJob>>,
    notify: Notify,
    seq: AtomicU64,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            seq: AtomicU64::new(0),
        }
    }

    /// Enqueue a job. Unbounded capacity: never blocks beyond the internal
    /// lock, never fails.
    pub async fn push(&self, mut job: BatchJob) {
        job.seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(
            batch_id = %job.batch_id,
            priority = %job.priority,
            ordinal = job.ordinal,
            "push: enqueueing job"
        );
        self.heap.lock().await.push(job);
        // A stored permit survives until the next notified().await, so a
        // push between the consumer's empty-check and its wait is not lost.
        self.notify.notify_one();
    }

    /// Dequeue the highest-ranked job, suspending while the queue is empty.
    /// Once returned, a job is never requeued.
    pub async fn pop(&self) -> BatchJob {
        loop {
            if let Some(job) = self.heap.lock().await.pop() {
                debug!(batch_id = %job.batch_id, priority = %job.priority, "pop: job dequeued");
                return job;
            }
            self.notify.notified().await;
        }
    }

    /// Number of jobs currently pending.
    pub async fn len(&self) -> usize {
        self.heap.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.heap.lock().await.is_empty()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
