//! Assertion generators: per-resource-type producers of structured checks.

pub mod listening_port;
pub mod registry;
pub mod types;
pub mod user;

pub use listening_port::ListeningPortGenerator;
pub use registry::GeneratorRegistry;
pub use types::{generator_fn, AssertionGenerator, FnGenerator, GeneratorFailure};
pub use user::UserGenerator;

use catgate_core::errors::GeneratorError;
use catgate_core::types::{scalar_string, Attributes};
use serde_json::Value;

/// Scalar attribute as a string. Missing and null read as `None`; a list or
/// map where a single value belongs is an `InvalidAttribute`.
pub(crate) fn attribute(attributes: &Attributes, key: &str) -> Result<Option<String>, GeneratorError> {
    match attributes.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_string(value).map(Some).ok_or_else(|| GeneratorError::InvalidAttribute {
            attribute: key.to_string(),
            message: format!("expected a single value, found {value}"),
        }),
    }
}

/// The declared `ensure`, if any.
pub(crate) fn ensure(attributes: &Attributes) -> Result<Option<String>, GeneratorError> {
    attribute(attributes, "ensure")
}
