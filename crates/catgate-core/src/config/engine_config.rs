//! Assertion execution engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for assertion execution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Execute assertions on a worker pool. Default: false.
    pub parallel: Option<bool>,
    /// Worker threads when parallel. Default: rayon's global pool.
    pub threads: Option<usize>,
}

impl EngineConfig {
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(false)
    }
}
