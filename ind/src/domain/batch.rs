//! Batch and ingestion records and their status state machines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{BatchId, IngestionId};
use super::priority::Priority;

/// Status of a single batch. Only ever moves forward:
/// yet_to_start -> triggered -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    YetToStart,
    Triggered,
    Completed,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YetToStart => write!(f, "yet_to_start"),
            Self::Triggered => write!(f, "triggered"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Aggregate status of an ingestion, derived from its batch statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionStatus {
    YetToStart,
    Triggered,
    Completed,
}

impl std::fmt::Display for IngestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YetToStart => write!(f, "yet_to_start"),
            Self::Triggered => write!(f, "triggered"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A batch observed an out-of-order status transition.
#[derive(Debug, Error)]
#[error("invalid batch transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: BatchStatus,
    pub to: BatchStatus,
}

/// A contiguous chunk of ids from one ingestion, the unit of scheduling and
/// status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: BatchId,
    pub ids: Vec<u64>,
    pub status: BatchStatus,
}

impl BatchRecord {
    /// Create a batch record in the yet_to_start state.
    pub fn new(ids: Vec<u64>) -> Self {
        Self {
            id: BatchId::new(),
            ids,
            status: BatchStatus::YetToStart,
        }
    }

    /// Transition to triggered. Rejects anything but yet_to_start.
    pub fn trigger(&mut self) -> Result<(), InvalidTransition> {
        if self.status != BatchStatus::YetToStart {
            return Err(InvalidTransition {
                from: self.status,
                to: BatchStatus::Triggered,
            });
        }
        self.status = BatchStatus::Triggered;
        Ok(())
    }

    /// Transition to completed. Rejects anything but triggered.
    pub fn complete(&mut self) -> Result<(), InvalidTransition> {
        if self.status != BatchStatus::Triggered {
            return Err(InvalidTransition {
                from: self.status,
                to: BatchStatus::Completed,
            });
        }
        self.status = BatchStatus::Completed;
        Ok(())
    }
}

/// One user submission: ids split into batches in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionRecord {
    pub id: IngestionId,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub batches: Vec<BatchRecord>,
}

impl IngestionRecord {
    /// Create a record with one yet_to_start batch per chunk.
    pub fn new(priority: Priority, chunks: Vec<Vec<u64>>) -> Self {
        Self {
            id: IngestionId::new(),
            priority,
            created_at: Utc::now(),
            batches: chunks.into_iter().map(BatchRecord::new).collect(),
        }
    }

    /// Fold batch statuses into the aggregate status. Computed fresh on
    /// every read, never cached.
    pub fn status(&self) -> IngestionStatus {
        if self.batches.is_empty() {
            return IngestionStatus::YetToStart;
        }
        if self
            .batches
            .iter()
            .all(|b| b.status == BatchStatus::Completed)
        {
            return IngestionStatus::Completed;
        }
        if self
            .batches
            .iter()
            .any(|b| b.status != BatchStatus::YetToStart)
        {
            return IngestionStatus::Triggered;
        }
        IngestionStatus::YetToStart
    }
}
