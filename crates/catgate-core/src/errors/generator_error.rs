//! Assertion generator errors.

use super::error_code::{self, ErrorCode};

/// Errors raised by a generator for a single resource. These never abort an
/// evaluation; the engine records them as errored results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("attribute '{attribute}' is invalid: {message}")]
    InvalidAttribute { attribute: String, message: String },

    #[error("malformed output: {0}")]
    Malformed(String),

    #[error("generator panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl ErrorCode for GeneratorError {
    fn error_code(&self) -> &'static str {
        error_code::GENERATOR_ERROR
    }
}
