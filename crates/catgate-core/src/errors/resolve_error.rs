//! Rule-set resolution errors.

use super::error_code::{self, ErrorCode};

/// The global rule location must exist; anything else is a configuration
/// error that aborts the evaluation.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Global policy location {path} is not accessible: {message}")]
    GlobalLocationInaccessible { path: String, message: String },

    #[error("Global policy location {path} is not a directory")]
    GlobalLocationNotDirectory { path: String },
}

impl ErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        error_code::RESOLVE_ERROR
    }
}
