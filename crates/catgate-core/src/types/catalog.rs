//! Compiled catalog: the resource graph for one node.

use serde::{Deserialize, Serialize};

use super::resource::{normalize_type_name, Resource, ResourceRef};
use crate::errors::CatalogError;

/// An already-compiled catalog. The policy gate only reads it.
///
/// Deserializes from the compiler's JSON catalog document; fields the gate
/// does not use (edges, version, code id) are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Node the catalog was compiled for.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Declared classes in declaration order.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Resources in declaration order.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: declare a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Builder: declare a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Parse a catalog JSON document.
    pub fn from_json(document: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(document).map_err(|e| CatalogError::Parse {
            message: e.to_string(),
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Exact, case-sensitive match; the compiler records class names in
    /// lowercase.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn resource(&self, reference: &ResourceRef) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.type_name == reference.type_name && r.title == reference.title)
    }

    pub fn resources_of_type<'a>(
        &'a self,
        type_name: &str,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        let wanted = normalize_type_name(type_name);
        self.resources.iter().filter(move |r| r.type_name == wanted)
    }

    /// Resources contained in a class. The compiler tags every resource with
    /// the (lowercased) names of its enclosing classes.
    pub fn resources_in_class<'a>(
        &'a self,
        class: &str,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        let tag = class.to_ascii_lowercase();
        self.resources
            .iter()
            .filter(move |r| r.tags.iter().any(|t| *t == tag))
    }
}
