//! Assertion evaluation errors.

use super::error_code::{self, ErrorCode};
use super::CatalogError;

/// Errors raised by an assertion's own logic. Recorded as errored results
/// with the message as detail, never propagated to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AssertionError {
    #[error("matcher '{matcher}' does not apply to {subject}")]
    UnsupportedMatcher { subject: String, matcher: String },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error(transparent)]
    Reference(#[from] CatalogError),

    #[error("assertion panicked: {0}")]
    Panicked(String),
}

impl ErrorCode for AssertionError {
    fn error_code(&self) -> &'static str {
        error_code::ASSERTION_ERROR
    }
}
