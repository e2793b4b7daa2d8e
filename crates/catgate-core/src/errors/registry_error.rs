//! Generator registry errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while registering assertion generators.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("A generator is already bound to resource type {resource_type}")]
    DuplicateBinding { resource_type: String },

    #[error("Generator bindings require a non-empty resource type")]
    EmptyResourceType,
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        error_code::REGISTRY_ERROR
    }
}
