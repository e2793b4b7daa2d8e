//! Compiler gate: obtains a compiled catalog, evaluates it against the
//! resolved rule sets, and returns it unchanged or rejects it.

pub mod compiler_gate;
pub mod request;
pub mod source;

pub use compiler_gate::{CompilerGate, Evaluation};
pub use request::CatalogRequest;
pub use source::{CatalogCompiler, FileCatalogSource};
