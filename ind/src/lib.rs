//! ingestd - priority batch ingestion daemon
//!
//! Accepts batches of integer identifiers for asynchronous ingestion,
//! schedules their processing under a strict priority + arrival-order
//! policy, and exposes status lookup by ingestion id.
//!
//! # Core Concepts
//!
//! - **Single dispatcher**: every dispatch is serialized through one
//!   background task, which is what makes the global one-batch-per-interval
//!   rate hold with no cross-job coordination
//! - **Derived status**: an ingestion's status is folded from its batch
//!   statuses on every read, never cached
//! - **Fire and forget**: submission returns as soon as jobs are queued;
//!   progress is observable only via status polling
//!
//! # Modules
//!
//! - [`domain`] - priorities, typed ids, batch and ingestion records
//! - [`scheduler`] - priority work queue and the dispatch loop
//! - [`store`] - in-memory record store
//! - [`service`] - submission and status orchestration
//! - [`fetch`] - external fetch seam and its simulation
//! - [`api`] - axum HTTP boundary
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod scheduler;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::{Config, FetchConfig, ServerConfig};
pub use domain::{
    BatchId, BatchRecord, BatchStatus, IngestionId, IngestionRecord, IngestionStatus, Priority,
};
pub use error::{IngestError, IngestResult};
pub use fetch::{BatchFetcher, SimulatedFetcher, create_fetcher};
pub use scheduler::{BatchJob, Dispatcher, SchedulerConfig, WorkQueue};
pub use service::{IngestionService, MAX_ID_VALUE, split_into_batches};
pub use store::IngestionStore;
