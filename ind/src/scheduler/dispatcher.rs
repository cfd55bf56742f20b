//! Single-consumer dispatch loop
//!
//! The only component that transitions batch state. Serializing every
//! dispatch through one task is what makes the global
//! one-batch-per-interval rate hold without cross-job coordination; a
//! second worker would need a shared rate-limit token instead.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, info, warn};

use crate::fetch::BatchFetcher;
use crate::scheduler::queue::WorkQueue;
use crate::store::IngestionStore;

/// Background worker: pops one job at a time, paces dispatch starts, runs
/// the external fetch, and records the batch transitions.
pub struct Dispatcher {
    queue: Arc<WorkQueue>,
    store: Arc<IngestionStore>,
    fetcher: Arc<dyn BatchFetcher>,
    interval: Duration,
}

impl Dispatcher {
    pub fn new(
        queue: Arc<WorkQueue>,
        store: Arc<IngestionStore>,
        fetcher: Arc<dyn BatchFetcher>,
        interval: Duration,
    ) -> Self {
        Self {
            queue,
            store,
            fetcher,
            interval,
        }
    }

    /// Run until a shutdown signal arrives.
    ///
    /// The signal is only observed between jobs, so a job that has been
    /// popped always reaches `completed` before the loop exits; jobs still
    /// queued are simply never popped again.
    pub async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(interval = ?self.interval, "Dispatcher started");
        let mut last_start: Option<Instant> = None;

        loop {
            let job = tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Dispatcher shutting down");
                    break;
                }
                job = self.queue.pop() => job,
            };

            // Spacing is start-to-start: the previous fetch's latency
            // neither shrinks the floor nor stacks on top of it.
            if let Some(prev) = last_start {
                let since = prev.elapsed();
                if since < self.interval {
                    debug!(wait = ?(self.interval - since), "run: rate limit wait");
                    sleep(self.interval - since).await;
                }
            }

            let started = Instant::now();
            debug!(
                batch_id = %job.batch_id,
                ingestion_id = %job.ingestion_id,
                priority = %job.priority,
                "run: dispatching batch"
            );

            self.store.mark_triggered(&job.batch_id).await;

            match self.store.batch_ids(&job.batch_id).await {
                Some(ids) => {
                    if let Err(e) = self.fetcher.fetch(&ids).await {
                        warn!(batch_id = %job.batch_id, error = %e, "run: fetch failed");
                    }
                }
                None => {
                    warn!(batch_id = %job.batch_id, "run: batch missing from store");
                }
            }

            self.store.mark_completed(&job.batch_id).await;
            debug!(batch_id = %job.batch_id, "run: batch completed");
            last_start = Some(started);
        }
    }
}
