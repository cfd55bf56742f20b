//! Submission and status orchestration
//!
//! The boundary the HTTP layer calls into: validates input, splits ids into
//! batches, persists records, then enqueues jobs. Every batch record is in
//! the store before its job is pushed, so the dispatcher can never observe
//! a job without a record.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{IngestionId, IngestionRecord, Priority};
use crate::error::{IngestError, IngestResult};
use crate::scheduler::{BatchJob, WorkQueue};
use crate::store::IngestionStore;

/// Largest id accepted for ingestion.
pub const MAX_ID_VALUE: u64 = 1_000_000_007;

/// Partition `ids` into chunks of at most `chunk_size`, preserving order.
/// The chunks concatenate back to the input exactly; empty input yields no
/// chunks. `chunk_size` must be nonzero; config validation enforces that
/// before a service is built.
pub fn split_into_batches(ids: &[u64], chunk_size: usize) -> Vec<Vec<u64>> {
    ids.chunks(chunk_size).map(|chunk| chunk.to_vec()).collect()
}

/// Front door for submissions and status reads.
pub struct IngestionService {
    store: Arc<IngestionStore>,
    queue: Arc<WorkQueue>,
    batch_size: usize,
}

impl IngestionService {
    pub fn new(store: Arc<IngestionStore>, queue: Arc<WorkQueue>, batch_size: usize) -> Self {
        Self {
            store,
            queue,
            batch_size,
        }
    }

    /// Accept a submission: validate, split, store, enqueue. Returns as soon
    /// as the jobs are queued; processing progress is observable only via
    /// `status`.
    pub async fn submit(&self, ids: Vec<u64>, priority: Priority) -> IngestResult<IngestionId> {
        debug!(count = ids.len(), %priority, "submit: called");

        if ids.is_empty() {
            return Err(IngestError::InvalidInput(
                "ids must not be empty".to_string(),
            ));
        }
        if let Some(bad) = ids.iter().find(|&&id| !(1..=MAX_ID_VALUE).contains(&id)) {
            return Err(IngestError::InvalidInput(format!(
                "id {} is out of the valid range [1, {}]",
                bad, MAX_ID_VALUE
            )));
        }

        let chunks = split_into_batches(&ids, self.batch_size);
        let (ingestion_id, batch_ids) = self.store.create_ingestion(priority, chunks).await;

        for (ordinal, batch_id) in batch_ids.into_iter().enumerate() {
            self.queue
                .push(BatchJob::new(
                    ingestion_id.clone(),
                    batch_id,
                    ordinal as u32,
                    priority,
                ))
                .await;
        }

        info!(%ingestion_id, %priority, "submit: ingestion accepted");
        Ok(ingestion_id)
    }

    /// Look up an ingestion snapshot by id.
    pub async fn status(&self, ingestion_id: &str) -> IngestResult<IngestionRecord> {
        debug!(%ingestion_id, "status: called");
        self.store
            .get(&IngestionId::from(ingestion_id))
            .await
            .ok_or_else(|| IngestError::NotFound(ingestion_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchStatus, IngestionStatus};
    use proptest::prelude::*;

    fn service() -> (IngestionService, Arc<WorkQueue>) {
        let queue = Arc::new(WorkQueue::new());
        let service = IngestionService::new(Arc::new(IngestionStore::new()), queue.clone(), 3);
        (service, queue)
    }

    #[test]
    fn test_split_exact_multiple() {
        let chunks = split_into_batches(&[1, 2, 3, 4, 5, 6], 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_split_with_remainder() {
        let chunks = split_into_batches(&[1, 2, 3, 4, 5, 6, 7], 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_into_batches(&[], 3).is_empty());
    }

    proptest! {
        #[test]
        fn test_split_partitions_input(
            ids in proptest::collection::vec(1u64..=MAX_ID_VALUE, 0..50),
            chunk_size in 1usize..10,
        ) {
            let chunks = split_into_batches(&ids, chunk_size);
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= chunk_size));
            let concat: Vec<u64> = chunks.iter().flatten().copied().collect();
            prop_assert_eq!(concat, ids);
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_ids() {
        let (service, queue) = service();
        let err = service.submit(vec![], Priority::High).await.unwrap_err();
        assert!(matches!(err, IngestError::InvalidInput(_)));
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_ids() {
        let (service, queue) = service();

        let err = service
            .submit(vec![1, MAX_ID_VALUE + 1], Priority::Medium)
            .await
            .unwrap_err();
        let IngestError::InvalidInput(msg) = &err else {
            panic!("expected InvalidInput, got {err:?}");
        };
        assert!(msg.contains("out of the valid range"));

        let err = service.submit(vec![0, 2], Priority::Medium).await.unwrap_err();
        assert!(matches!(err, IngestError::InvalidInput(_)));

        // Rejected before any state mutation
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_submit_creates_yet_to_start_records() {
        let (service, queue) = service();
        let ingestion_id = service
            .submit(vec![1, 2, 3, 4, 5], Priority::Low)
            .await
            .unwrap();

        let record = service.status(ingestion_id.as_str()).await.unwrap();
        assert_eq!(record.status(), IngestionStatus::YetToStart);
        assert_eq!(record.batches.len(), 2);
        assert_eq!(record.batches[0].ids, vec![1, 2, 3]);
        assert_eq!(record.batches[1].ids, vec![4, 5]);
        assert!(record
            .batches
            .iter()
            .all(|b| b.status == BatchStatus::YetToStart));

        assert_eq!(queue.len().await, 2);
    }

    #[tokio::test]
    async fn test_max_id_value_is_accepted() {
        let (service, _queue) = service();
        assert!(service.submit(vec![MAX_ID_VALUE], Priority::High).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_unknown_id_is_not_found() {
        let (service, _queue) = service();
        let err = service.status("does-not-exist").await.unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }
}
