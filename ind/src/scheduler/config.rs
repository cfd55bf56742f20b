//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduling knobs: how submissions are chunked and how often a batch may
/// start dispatching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum ids per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Minimum spacing between dispatch starts, in seconds
    #[serde(default = "default_dispatch_interval_secs")]
    pub dispatch_interval_secs: u64,
}

fn default_batch_size() -> usize {
    3
}

fn default_dispatch_interval_secs() -> u64 {
    5
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            dispatch_interval_secs: 5,
        }
    }
}

impl SchedulerConfig {
    /// Get the dispatch interval as a Duration
    pub fn dispatch_interval(&self) -> Duration {
        Duration::from_secs(self.dispatch_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.dispatch_interval_secs, 5);
    }

    #[test]
    fn test_dispatch_interval_duration() {
        let config = SchedulerConfig {
            dispatch_interval_secs: 2,
            ..Default::default()
        };
        assert_eq!(config.dispatch_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SchedulerConfig = serde_yaml::from_str("batch_size: 5").unwrap();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.dispatch_interval_secs, 5);
    }
}
