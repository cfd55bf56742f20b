//! Typed identifiers for ingestions and batches
//!
//! Ids are UUIDv7 strings: unique for the process lifetime, never reused.

use serde::{Deserialize, Serialize};

/// Identifier of one ingestion submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestionId(String);

impl IngestionId {
    /// Allocate a fresh ingestion id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Get the full id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for IngestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IngestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IngestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IngestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for IngestionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of one batch within an ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Allocate a fresh batch id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Get the full id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BatchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
