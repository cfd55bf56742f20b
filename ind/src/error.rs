//! Service-level error taxonomy

use thiserror::Error;

/// Errors surfaced to submitters and status readers.
///
/// Everything that can go wrong after a submission is accepted is
/// fire-and-forget: invisible here, observable only via status polling.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed submission, rejected before any state mutation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown ingestion id on a status read.
    #[error("ingestion not found: {0}")]
    NotFound(String),
}

/// Result of service operations
pub type IngestResult<T> = Result<T, IngestError>;
