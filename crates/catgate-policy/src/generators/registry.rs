//! Resource type → generator bindings.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use catgate_core::errors::{GeneratorError, RegistryError};
use catgate_core::types::{normalize_type_name, Resource};
use rustc_hash::FxHashMap;

use super::listening_port::ListeningPortGenerator;
use super::types::{AssertionGenerator, GeneratorFailure};
use super::user::UserGenerator;
use crate::assertions::{Assertion, AssertionOrigin};
use crate::engine::runner::panic_message;

/// Registry of assertion generators, at most one per resource type.
///
/// Built once and shared read-only by every evaluation.
#[derive(Default)]
pub struct GeneratorRegistry {
    bindings: FxHashMap<String, Box<dyn AssertionGenerator>>,
}

impl GeneratorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in generators bound:
    /// `User` and `Apache::Vhost`.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.bind("User", Box::new(UserGenerator));
        registry.bind("Apache::Vhost", Box::new(ListeningPortGenerator));
        registry
    }

    /// Bind a generator to a resource type. Type names are normalized, so
    /// `apache::vhost` and `Apache::Vhost` are the same binding.
    pub fn register<G>(&mut self, resource_type: &str, generator: G) -> Result<(), RegistryError>
    where
        G: AssertionGenerator + 'static,
    {
        let key = normalize_type_name(resource_type);
        if key.is_empty() {
            return Err(RegistryError::EmptyResourceType);
        }
        if self.bindings.contains_key(&key) {
            return Err(RegistryError::DuplicateBinding { resource_type: key });
        }
        tracing::debug!(resource_type = %key, generator = generator.name(), "generator registered");
        self.bind(&key, Box::new(generator));
        Ok(())
    }

    fn bind(&mut self, resource_type: &str, generator: Box<dyn AssertionGenerator>) {
        self.bindings
            .insert(normalize_type_name(resource_type), generator);
    }

    /// The generator bound to a resource type, if any.
    pub fn binding(&self, resource_type: &str) -> Option<&dyn AssertionGenerator> {
        self.bindings
            .get(&normalize_type_name(resource_type))
            .map(|g| g.as_ref())
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.binding(resource_type).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound resource types, sorted.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Assertions for one resource. Resources with no bound generator yield
    /// nothing. A generator error, panic, or a check without a subject is
    /// reported as a [`GeneratorFailure`] for this resource alone.
    pub fn generate(&self, resource: &Resource) -> Result<Vec<Assertion>, GeneratorFailure> {
        let Some(generator) = self.binding(&resource.type_name) else {
            return Ok(Vec::new());
        };
        let reference = resource.reference();
        let fail = |error: GeneratorError| GeneratorFailure {
            generator: generator.name().to_string(),
            resource: reference.clone(),
            error,
        };

        let checks = catch_unwind(AssertUnwindSafe(|| {
            generator.generate(&resource.title, &resource.attributes)
        }))
        .map_err(|payload| fail(GeneratorError::Panicked(panic_message(payload))))?
        .map_err(&fail)?;

        if let Some(malformed) = checks
            .iter()
            .find(|c| c.subject.identifier().trim().is_empty())
        {
            return Err(fail(GeneratorError::Malformed(format!(
                "check '{malformed}' has an empty subject"
            ))));
        }

        let name = generator.name();
        Ok(checks
            .into_iter()
            .enumerate()
            .map(|(i, check)| Assertion {
                id: format!("{name}:{reference}#{}", i + 1),
                description: check.to_string(),
                origin: AssertionOrigin::Generated {
                    generator: name.to_string(),
                    resource: reference.clone(),
                },
                check,
            })
            .collect())
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.resource_types()
                    .into_iter()
                    .filter_map(|t| self.bindings.get(t).map(|g| (t, g.name()))),
            )
            .finish()
    }
}
