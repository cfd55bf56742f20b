//! Domain types for ingestd
//!
//! Core domain types: Priority, typed ids, batch and ingestion records with
//! their status state machines. Batch transitions are guarded methods so an
//! out-of-order update can be rejected instead of corrupting state.

mod batch;
mod id;
mod priority;

pub use batch::{BatchRecord, BatchStatus, IngestionRecord, IngestionStatus, InvalidTransition};
pub use id::{BatchId, IngestionId};
pub use priority::Priority;
