//! External data fetch seam
//!
//! The dispatcher treats the downstream data source as an opaque async
//! operation behind the `BatchFetcher` trait. The shipped implementation
//! simulates it with a sleep; swapping in a real client is a config change,
//! not a scheduler change.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;

/// An external fetch of the payloads for one batch of ids.
#[async_trait]
pub trait BatchFetcher: Send + Sync {
    /// Fetch the payloads for `ids`. The simulated implementation always
    /// succeeds; a real integration may not.
    async fn fetch(&self, ids: &[u64]) -> eyre::Result<()>;
}

/// Simulated fetcher: sleeps for the configured latency, plus optional
/// random jitter, instead of calling anything.
pub struct SimulatedFetcher {
    latency: Duration,
    jitter: Duration,
}

impl SimulatedFetcher {
    pub fn new(latency: Duration, jitter: Duration) -> Self {
        Self { latency, jitter }
    }
}

#[async_trait]
impl BatchFetcher for SimulatedFetcher {
    async fn fetch(&self, ids: &[u64]) -> eyre::Result<()> {
        let mut delay = self.latency;
        if !self.jitter.is_zero() {
            delay += self.jitter.mul_f64(rand::random::<f64>());
        }
        debug!(count = ids.len(), ?delay, "fetch: simulating external call");
        tokio::time::sleep(delay).await;
        Ok(())
    }
}

/// Build the fetcher specified by config.
pub fn create_fetcher(config: &FetchConfig) -> Arc<dyn BatchFetcher> {
    debug!(
        latency_ms = config.latency_ms,
        jitter_ms = config.jitter_ms,
        "create_fetcher: called"
    );
    Arc::new(SimulatedFetcher::new(
        Duration::from_millis(config.latency_ms),
        Duration::from_millis(config.jitter_ms),
    ))
}
