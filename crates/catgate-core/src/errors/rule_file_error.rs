//! Static rule file errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while loading a static rule file. Each one is recorded as a
/// single errored result for the offending file.
#[derive(Debug, thiserror::Error)]
pub enum RuleFileError {
    #[error("Failed to read rule file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse rule file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Rule file {path} declares assertion '{id}' more than once")]
    DuplicateId { path: String, id: String },

    #[error("Rule file {path} declares an assertion with an empty id")]
    EmptyId { path: String },
}

impl ErrorCode for RuleFileError {
    fn error_code(&self) -> &'static str {
        error_code::RULE_FILE_ERROR
    }
}
