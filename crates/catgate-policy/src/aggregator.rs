//! Turns an evaluation report into an allow/deny decision.

use catgate_core::constants::{FAILED_POLICY_PREFIX, POLICY_FAILURE_HEADER};
use catgate_core::errors::GateError;
use serde::{Deserialize, Serialize};

use crate::engine::{EvaluationReport, EvaluationResult};

/// Final outcome for one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Allow,
    /// One formatted line per failed or errored result, in report order.
    Deny { failures: Vec<String> },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn failures(&self) -> &[String] {
        match self {
            Self::Allow => &[],
            Self::Deny { failures } => failures,
        }
    }

    /// Header plus failure lines, or `None` when allowed.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::Deny { failures } => Some(format!(
                "{}\n{}",
                POLICY_FAILURE_HEADER,
                failures.join("\n")
            )),
        }
    }

    /// The error a gate raises for this decision.
    pub fn into_error(self) -> Option<GateError> {
        match self {
            Self::Allow => None,
            Self::Deny { failures } => Some(GateError::PolicyViolation { failures }),
        }
    }
}

/// Stateless; a decision depends only on the report it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn aggregate(report: &EvaluationReport) -> Decision {
        let failures: Vec<String> = report.failures().map(failure_line).collect();
        if failures.is_empty() {
            Decision::Allow
        } else {
            Decision::Deny { failures }
        }
    }
}

fn failure_line(result: &EvaluationResult) -> String {
    let detail = result
        .detail
        .clone()
        .unwrap_or_else(|| format!("{}: {}", result.assertion_id, result.description));
    format!("{FAILED_POLICY_PREFIX}{detail}")
}
