//! Generator trait and failure record.

use catgate_core::errors::GeneratorError;
use catgate_core::types::{Attributes, ResourceRef};

use crate::assertions::Check;
use crate::engine::EvaluationResult;

/// Produces checks for one resource declaration.
///
/// Implementations are pure: the same title and attributes always yield the
/// same checks, and nothing outside the arguments is read.
pub trait AssertionGenerator: Send + Sync {
    /// Stable generator name, used in assertion ids.
    fn name(&self) -> &str;

    fn generate(&self, title: &str, attributes: &Attributes) -> Result<Vec<Check>, GeneratorError>;
}

/// Closure-backed generator, built with [`generator_fn`].
pub struct FnGenerator<F> {
    name: String,
    generate: F,
}

impl<F> AssertionGenerator for FnGenerator<F>
where
    F: Fn(&str, &Attributes) -> Result<Vec<Check>, GeneratorError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, title: &str, attributes: &Attributes) -> Result<Vec<Check>, GeneratorError> {
        (self.generate)(title, attributes)
    }
}

/// Wrap a closure as a named generator.
pub fn generator_fn<F>(name: impl Into<String>, generate: F) -> FnGenerator<F>
where
    F: Fn(&str, &Attributes) -> Result<Vec<Check>, GeneratorError> + Send + Sync,
{
    FnGenerator {
        name: name.into(),
        generate,
    }
}

/// A generator that failed for one resource. Converted into a single errored
/// result; the rest of the evaluation carries on.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorFailure {
    pub generator: String,
    pub resource: ResourceRef,
    pub error: GeneratorError,
}

impl GeneratorFailure {
    /// `<generator>:<Type[title]>`
    pub fn assertion_id(&self) -> String {
        format!("{}:{}", self.generator, self.resource)
    }

    pub fn into_result(self) -> EvaluationResult {
        let id = self.assertion_id();
        EvaluationResult::errored_source(
            id.clone(),
            format!("assertions generated for {}", self.resource),
            format!("generator '{}' for {}", self.generator, self.resource),
            format!(
                "{id}: generator '{}' failed for {}: {}",
                self.generator, self.resource, self.error
            ),
        )
    }
}
