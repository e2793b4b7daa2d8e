//! Rule-set storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_POLICY_BASE_PATH;

/// Where the rule-set hierarchy lives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyConfig {
    /// Root of the rule-set hierarchy. Global rules live here, per-class
    /// rules under `class/<token>`.
    pub base_path: Option<PathBuf>,
}

impl PolicyConfig {
    /// Returns the effective base path, defaulting to the production
    /// environment's policy directory.
    pub fn effective_base_path(&self) -> PathBuf {
        self.base_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POLICY_BASE_PATH))
    }
}
