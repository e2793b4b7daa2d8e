//! GateEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Observer of gate evaluations.
///
/// Handlers only override the events they care about. `Send + Sync` so one
/// handler can observe evaluations running on several threads.
pub trait GateEventHandler: Send + Sync {
    fn on_evaluation_started(&self, _event: &EvaluationStartedEvent) {}
    fn on_assertion_failed(&self, _event: &AssertionFailedEvent) {}
    fn on_decision(&self, _event: &DecisionEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
