//! Facts decoding configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FACTS_FORMAT;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FactsConfig {
    /// Format assumed when a request does not name one. Default: "json".
    pub default_format: Option<String>,
}

impl FactsConfig {
    pub fn effective_default_format(&self) -> &str {
        self.default_format.as_deref().unwrap_or(DEFAULT_FACTS_FORMAT)
    }
}
