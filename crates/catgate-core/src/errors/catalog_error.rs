//! Catalog document errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while reading catalog documents or resource references.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid resource reference '{0}': expected Type[title]")]
    InvalidReference(String),

    #[error("Failed to parse catalog document: {message}")]
    Parse { message: String },
}

impl ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOG_ERROR
    }
}
