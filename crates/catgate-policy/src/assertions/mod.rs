//! Assertion model: structured checks over a catalog and its facts.

pub mod evaluator;
pub mod types;

pub use evaluator::{evaluate, CheckOutcome};
pub use types::*;
