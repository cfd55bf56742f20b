//! Authoritative in-memory state for ingestion and batch records
//!
//! One writer transitions batch state (the dispatcher) while submissions
//! add records and status reads take snapshots. A single mutex over the
//! whole map keeps every read consistent with the latest batch mutations;
//! at one batch per interval that lock is never contended enough to matter.
//!
//! Records live for the process lifetime; nothing is evicted.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::domain::{
    BatchId, BatchRecord, IngestionId, IngestionRecord, InvalidTransition, Priority,
};

struct StoreInner {
    ingestions: HashMap<IngestionId, IngestionRecord>,
    /// batch id -> owning ingestion, for the dispatcher's by-batch updates
    batch_index: HashMap<BatchId, IngestionId>,
}

/// Concurrency-safe map of all ingestion state.
pub struct IngestionStore {
    inner: Mutex<StoreInner>,
}

impl IngestionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                ingestions: HashMap::new(),
                batch_index: HashMap::new(),
            }),
        }
    }

    /// Create an ingestion and all of its batch records atomically, every
    /// batch starting as yet_to_start. Callers enqueue jobs only after this
    /// returns, so a dispatched batch always has a record to update.
    pub async fn create_ingestion(
        &self,
        priority: Priority,
        chunks: Vec<Vec<u64>>,
    ) -> (IngestionId, Vec<BatchId>) {
        let record = IngestionRecord::new(priority, chunks);
        let ingestion_id = record.id.clone();
        let batch_ids: Vec<BatchId> = record.batches.iter().map(|b| b.id.clone()).collect();

        let mut inner = self.inner.lock().await;
        for batch_id in &batch_ids {
            inner.batch_index.insert(batch_id.clone(), ingestion_id.clone());
        }
        inner.ingestions.insert(ingestion_id.clone(), record);
        debug!(%ingestion_id, batches = batch_ids.len(), "create_ingestion: stored");

        (ingestion_id, batch_ids)
    }

    /// Set a batch to triggered. An out-of-order transition is an internal
    /// consistency failure: logged, state left untouched, nothing surfaced
    /// to callers.
    pub async fn mark_triggered(&self, batch_id: &BatchId) {
        self.transition(batch_id, "triggered", BatchRecord::trigger)
            .await;
    }

    /// Set a batch to completed. Same defensive policy as `mark_triggered`.
    pub async fn mark_completed(&self, batch_id: &BatchId) {
        self.transition(batch_id, "completed", BatchRecord::complete)
            .await;
    }

    async fn transition<F>(&self, batch_id: &BatchId, to: &str, apply: F)
    where
        F: FnOnce(&mut BatchRecord) -> Result<(), InvalidTransition>,
    {
        let mut inner = self.inner.lock().await;
        let Some(ingestion_id) = inner.batch_index.get(batch_id).cloned() else {
            error!(%batch_id, to, "transition: unknown batch id");
            return;
        };
        let Some(record) = inner.ingestions.get_mut(&ingestion_id) else {
            error!(%batch_id, %ingestion_id, "transition: batch indexed but ingestion missing");
            return;
        };
        let Some(batch) = record.batches.iter_mut().find(|b| &b.id == batch_id) else {
            error!(%batch_id, %ingestion_id, "transition: batch not on its ingestion");
            return;
        };
        match apply(batch) {
            Ok(()) => debug!(%batch_id, to, "transition: batch updated"),
            Err(e) => error!(%batch_id, error = %e, "transition: rejected"),
        }
    }

    /// Snapshot the ids of one batch.
    pub async fn batch_ids(&self, batch_id: &BatchId) -> Option<Vec<u64>> {
        let inner = self.inner.lock().await;
        let ingestion_id = inner.batch_index.get(batch_id)?;
        let record = inner.ingestions.get(ingestion_id)?;
        record
            .batches
            .iter()
            .find(|b| &b.id == batch_id)
            .map(|b| b.ids.clone())
    }

    /// Snapshot an ingestion record, or None if the id is unknown. The
    /// aggregate status is derived from the snapshot by the caller, never
    /// stored here.
    pub async fn get(&self, ingestion_id: &IngestionId) -> Option<IngestionRecord> {
        self.inner.lock().await.ingestions.get(ingestion_id).cloned()
    }
}

impl Default for IngestionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchStatus, IngestionStatus};

    #[tokio::test]
    async fn test_create_and_get() {
        let store = IngestionStore::new();
        let (ingestion_id, batch_ids) = store
            .create_ingestion(Priority::High, vec![vec![1, 2, 3], vec![4, 5]])
            .await;

        assert_eq!(batch_ids.len(), 2);

        let record = store.get(&ingestion_id).await.unwrap();
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.status(), IngestionStatus::YetToStart);
        assert_eq!(record.batches[0].ids, vec![1, 2, 3]);
        assert_eq!(record.batches[1].ids, vec![4, 5]);
        assert!(record
            .batches
            .iter()
            .all(|b| b.status == BatchStatus::YetToStart));
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let store = IngestionStore::new();
        assert!(store.get(&IngestionId::from("nope")).await.is_none());
    }

    #[tokio::test]
    async fn test_mark_transitions_update_aggregate() {
        let store = IngestionStore::new();
        let (ingestion_id, batch_ids) = store
            .create_ingestion(Priority::Medium, vec![vec![1], vec![2]])
            .await;

        store.mark_triggered(&batch_ids[0]).await;
        let record = store.get(&ingestion_id).await.unwrap();
        assert_eq!(record.batches[0].status, BatchStatus::Triggered);
        assert_eq!(record.status(), IngestionStatus::Triggered);

        store.mark_completed(&batch_ids[0]).await;
        let record = store.get(&ingestion_id).await.unwrap();
        assert_eq!(record.batches[0].status, BatchStatus::Completed);
        assert_eq!(record.status(), IngestionStatus::Triggered);

        store.mark_triggered(&batch_ids[1]).await;
        store.mark_completed(&batch_ids[1]).await;
        let record = store.get(&ingestion_id).await.unwrap();
        assert_eq!(record.status(), IngestionStatus::Completed);
    }

    #[tokio::test]
    async fn test_invalid_transition_leaves_state_untouched() {
        let store = IngestionStore::new();
        let (ingestion_id, batch_ids) = store
            .create_ingestion(Priority::Low, vec![vec![1]])
            .await;

        // Complete before trigger: rejected
        store.mark_completed(&batch_ids[0]).await;
        let record = store.get(&ingestion_id).await.unwrap();
        assert_eq!(record.batches[0].status, BatchStatus::YetToStart);

        // Double trigger: second one rejected
        store.mark_triggered(&batch_ids[0]).await;
        store.mark_triggered(&batch_ids[0]).await;
        let record = store.get(&ingestion_id).await.unwrap();
        assert_eq!(record.batches[0].status, BatchStatus::Triggered);
    }

    #[tokio::test]
    async fn test_unknown_batch_id_is_ignored() {
        let store = IngestionStore::new();
        store.create_ingestion(Priority::Low, vec![vec![1]]).await;

        // Must not panic or corrupt anything
        store.mark_triggered(&BatchId::from("missing")).await;
        assert!(store.batch_ids(&BatchId::from("missing")).await.is_none());
    }

    #[tokio::test]
    async fn test_batch_ids_snapshot() {
        let store = IngestionStore::new();
        let (_, batch_ids) = store
            .create_ingestion(Priority::High, vec![vec![7, 8, 9]])
            .await;
        assert_eq!(store.batch_ids(&batch_ids[0]).await.unwrap(), vec![7, 8, 9]);
    }
}
