//! Batch scheduling: the priority work queue and the dispatch loop
//!
//! Submissions push one job per batch; a single background dispatcher pops
//! them in priority order and paces dispatch starts to the configured
//! interval.

mod config;
mod dispatcher;
mod queue;

pub use config::SchedulerConfig;
pub use dispatcher::Dispatcher;
pub use queue::{BatchJob, WorkQueue};
