//! Compiler gate errors.

use super::error_code::{self, ErrorCode};
use super::{CompileError, ConfigError, FactsError, ResolveError};
use crate::constants::POLICY_FAILURE_HEADER;

/// Errors that escape a gate invocation. Everything except
/// `PolicyViolation` is fatal configuration or input trouble raised before
/// any assertion runs.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Facts error: {0}")]
    Facts(#[from] FactsError),

    #[error("Policy resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Catalog error: {0}")]
    Compile(#[from] CompileError),

    #[error("{}\n{}", POLICY_FAILURE_HEADER, .failures.join("\n"))]
    PolicyViolation { failures: Vec<String> },
}

impl GateError {
    /// Formatted failure lines when the catalog was denied.
    pub fn failures(&self) -> &[String] {
        match self {
            Self::PolicyViolation { failures } => failures,
            _ => &[],
        }
    }
}

impl ErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Facts(e) => e.error_code(),
            Self::Resolve(e) => e.error_code(),
            Self::Compile(e) => e.error_code(),
            Self::PolicyViolation { .. } => error_code::POLICY_VIOLATION,
        }
    }
}
