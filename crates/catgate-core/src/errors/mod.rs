//! Error handling for the catalog policy gate.
//! One error enum per subsystem, `thiserror` only.

pub mod assertion_error;
pub mod catalog_error;
pub mod compile_error;
pub mod config_error;
pub mod error_code;
pub mod facts_error;
pub mod gate_error;
pub mod generator_error;
pub mod registry_error;
pub mod resolve_error;
pub mod rule_file_error;

pub use assertion_error::AssertionError;
pub use catalog_error::CatalogError;
pub use compile_error::CompileError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use facts_error::FactsError;
pub use gate_error::GateError;
pub use generator_error::GeneratorError;
pub use registry_error::RegistryError;
pub use resolve_error::ResolveError;
pub use rule_file_error::RuleFileError;
