//! Inbound catalog requests.

use serde::{Deserialize, Serialize};

/// A request for a node's compiled catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    /// Identifies the catalog to the compiler; usually the node name.
    pub catalog_id: String,
    pub node: String,
    /// Form-escaped facts payload as received on the wire.
    #[serde(default)]
    pub facts: String,
    /// `json`, `pson`, or `yaml`. Falls back to the configured default.
    #[serde(default)]
    pub facts_format: Option<String>,
}

impl CatalogRequest {
    pub fn new(catalog_id: impl Into<String>, node: impl Into<String>, facts: impl Into<String>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            node: node.into(),
            facts: facts.into(),
            facts_format: None,
        }
    }

    /// Request for a node whose catalog id is its own name.
    pub fn for_node(node: impl Into<String>, facts: impl Into<String>) -> Self {
        let node = node.into();
        Self::new(node.clone(), node, facts)
    }

    pub fn with_facts_format(mut self, format: impl Into<String>) -> Self {
        self.facts_format = Some(format.into());
        self
    }
}
