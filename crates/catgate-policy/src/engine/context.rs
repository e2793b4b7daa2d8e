//! Per-run execution context.

use catgate_core::types::{Catalog, Facts, Resource, ResourceRef};

/// Read-only view of the catalog and facts handed to every predicate.
///
/// One context is built per run and dropped when the run returns; it holds
/// only shared borrows, so nothing evaluated through it can outlive or
/// mutate the inputs.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    catalog: &'a Catalog,
    facts: &'a Facts,
    source: Option<&'a ResourceRef>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(catalog: &'a Catalog, facts: &'a Facts) -> Self {
        Self {
            catalog,
            facts,
            source: None,
        }
    }

    /// Narrow the context to checks generated from `resource`; that resource
    /// cannot vouch for its own checks.
    pub fn with_source(self, resource: &'a ResourceRef) -> Self {
        Self {
            source: Some(resource),
            ..self
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn facts(&self) -> &'a Facts {
        self.facts
    }

    pub fn source(&self) -> Option<&'a ResourceRef> {
        self.source
    }

    /// Whether `resource` is the one the current check was generated from.
    pub fn is_source(&self, resource: &Resource) -> bool {
        self.source
            .is_some_and(|r| r.type_name == resource.type_name && r.title == resource.title)
    }
}
