//! Policy pipeline for compiled catalogs.
//!
//! Stages, in the order the gate drives them:
//! - `resolver`: catalog classes to rule-set locations on disk
//! - `generators`: resource declarations to synthesized checks
//! - `engine`: static and generated assertions to an evaluation report
//! - `aggregator`: evaluation report to an allow/deny decision
//! - `gate`: orchestration around an external catalog compiler

pub mod aggregator;
pub mod assertions;
pub mod engine;
pub mod gate;
pub mod generators;
pub mod resolver;

pub use aggregator::{Decision, ResultAggregator};
pub use assertions::{Assertion, AssertionOrigin, Check, Matcher, Subject};
pub use engine::{AssertionEngine, EvaluationReport, EvaluationResult, ResultStatus};
pub use gate::{CatalogCompiler, CatalogRequest, CompilerGate, Evaluation, FileCatalogSource};
pub use generators::{
    generator_fn, AssertionGenerator, GeneratorFailure, GeneratorRegistry, ListeningPortGenerator,
    UserGenerator,
};
pub use resolver::{class_token, LocationScope, PolicyResolver, RuleSetLocation};
