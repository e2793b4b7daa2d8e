//! Event payloads emitted by the compiler gate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationStartedEvent {
    pub node: String,
    pub location_count: usize,
    pub resource_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionFailedEvent {
    pub node: String,
    pub assertion_id: String,
    /// True when the assertion errored rather than reporting an unmet
    /// condition.
    pub errored: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub node: String,
    pub allowed: bool,
    pub assertion_count: usize,
    pub failure_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub node: String,
    pub error_code: String,
    pub message: String,
}
