//! Facts decoding errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while turning an encoded facts payload into `Facts`.
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error("Unsupported facts format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Facts payload is not valid percent-encoded UTF-8: {message}")]
    Unescape { message: String },

    #[error("Failed to decode {format} facts: {message}")]
    Decode { format: String, message: String },

    #[error("Facts document must be a mapping, found {found}")]
    NotAMapping { found: String },
}

impl ErrorCode for FactsError {
    fn error_code(&self) -> &'static str {
        error_code::FACTS_ERROR
    }
}
