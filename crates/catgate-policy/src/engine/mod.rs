//! Assertion execution engine: loads static rules, materializes generated
//! assertions, and runs every one of them against a single catalog.

pub mod context;
pub mod loader;
pub mod report;
pub mod runner;

pub use context::ExecutionContext;
pub use loader::{load_location, parse_rule_file, RuleDefinition, WorkItem};
pub use report::{EvaluationReport, EvaluationResult, ResultStatus};
pub use runner::{execute_assertion, AssertionEngine};
