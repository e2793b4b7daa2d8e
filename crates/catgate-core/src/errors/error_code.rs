//! ErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code alongside its human-readable message.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged form: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const FACTS_ERROR: &str = "FACTS_ERROR";
pub const CATALOG_ERROR: &str = "CATALOG_ERROR";
pub const COMPILE_ERROR: &str = "COMPILE_ERROR";
pub const RESOLVE_ERROR: &str = "RESOLVE_ERROR";
pub const REGISTRY_ERROR: &str = "REGISTRY_ERROR";
pub const GENERATOR_ERROR: &str = "GENERATOR_ERROR";
pub const ASSERTION_ERROR: &str = "ASSERTION_ERROR";
pub const RULE_FILE_ERROR: &str = "RULE_FILE_ERROR";
pub const POLICY_VIOLATION: &str = "POLICY_VIOLATION";
