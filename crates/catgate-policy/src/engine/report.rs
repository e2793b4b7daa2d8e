//! Evaluation results and the per-run report.

use serde::{Deserialize, Serialize};

use crate::assertions::Assertion;

/// Outcome of one executed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Passed,
    Failed,
    Errored,
}

impl ResultStatus {
    /// Failed and errored results both count against the catalog.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Errored)
    }
}

/// One record per executed assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub assertion_id: String,
    pub description: String,
    /// Rendered origin: the rule file, or the generator and resource.
    pub origin: String,
    pub status: ResultStatus,
    pub detail: Option<String>,
}

impl EvaluationResult {
    pub fn passed(assertion: &Assertion) -> Self {
        Self::from_assertion(assertion, ResultStatus::Passed, None)
    }

    pub fn failed(assertion: &Assertion, detail: String) -> Self {
        Self::from_assertion(assertion, ResultStatus::Failed, Some(detail))
    }

    pub fn errored(assertion: &Assertion, detail: String) -> Self {
        Self::from_assertion(assertion, ResultStatus::Errored, Some(detail))
    }

    /// An errored result for something that never became an assertion
    /// (an unreadable rule file, a failing generator).
    pub fn errored_source(
        assertion_id: String,
        description: String,
        origin: String,
        detail: String,
    ) -> Self {
        Self {
            assertion_id,
            description,
            origin,
            status: ResultStatus::Errored,
            detail: Some(detail),
        }
    }

    fn from_assertion(assertion: &Assertion, status: ResultStatus, detail: Option<String>) -> Self {
        Self {
            assertion_id: assertion.id.clone(),
            description: assertion.description.clone(),
            origin: assertion.origin.to_string(),
            status,
            detail,
        }
    }
}

/// Ordered results of one evaluation. Built fresh per run and consumed when
/// the decision is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    results: Vec<EvaluationResult>,
}

impl EvaluationReport {
    pub fn new(results: Vec<EvaluationResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<EvaluationResult> {
        self.results
    }

    /// Failed and errored results in production order.
    pub fn failures(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.results.iter().filter(|r| r.status.is_failure())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn count(&self, status: ResultStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// True when nothing failed or errored.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Serialize the report for audit output.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
