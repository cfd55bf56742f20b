//! Daemon configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scheduler::SchedulerConfig;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); CLI flag wins over this
    pub log_level: Option<String>,

    /// Batch sizing and dispatch pacing
    pub scheduler: SchedulerConfig,

    /// Simulated external fetch timing
    pub fetch: FetchConfig,

    /// HTTP listener
    pub server: ServerConfig,
}

impl Config {
    /// Validate configuration before use. Call early in startup to fail
    /// fast with a clear message.
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.batch_size == 0 {
            return Err(eyre::eyre!("scheduler.batch_size must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain: explicit path, then
    /// project-local `ingestd.yml`, then the user config dir, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from("ingestd.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ingestd").join("ingestd.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from {}: {}",
                            user_config.display(),
                            e
                        );
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level from a config file, for logging setup before
    /// the full config load.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => {
                let local = PathBuf::from("ingestd.yml");
                if !local.exists() {
                    return None;
                }
                local
            }
        };
        let content = fs::read_to_string(path).ok()?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
        value.get("log_level")?.as_str().map(str::to_string)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Simulated external fetch timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base latency per batch fetch, in milliseconds
    pub latency_ms: u64,

    /// Extra random latency added on top, in milliseconds
    pub jitter_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            jitter_ms: 0,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
