//! Errors surfaced by the external catalog compiler.

use super::error_code::{self, ErrorCode};
use super::CatalogError;

/// Failures obtaining a compiled catalog for a request.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("No catalog available for '{catalog_id}'")]
    NotFound { catalog_id: String },

    #[error("Failed to read catalog '{catalog_id}': {message}")]
    Io { catalog_id: String, message: String },

    #[error("Catalog '{catalog_id}' is invalid: {source}")]
    Invalid {
        catalog_id: String,
        #[source]
        source: CatalogError,
    },

    #[error("Catalog compilation failed: {0}")]
    Failed(String),
}

impl ErrorCode for CompileError {
    fn error_code(&self) -> &'static str {
        error_code::COMPILE_ERROR
    }
}
