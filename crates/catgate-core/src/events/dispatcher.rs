//! Synchronous event dispatch.

use std::sync::Arc;

use super::handler::GateEventHandler;
use super::types::*;

/// Synchronous dispatcher over a list of handlers. With no handlers,
/// emitting is an empty loop.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn GateEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn GateEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A handler that panics is logged and skipped; the remaining handlers
    /// still receive the event.
    fn emit<F: Fn(&dyn GateEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_evaluation_started(&self, event: &EvaluationStartedEvent) {
        self.emit(|h| h.on_evaluation_started(event));
    }

    pub fn emit_assertion_failed(&self, event: &AssertionFailedEvent) {
        self.emit(|h| h.on_assertion_failed(event));
    }

    pub fn emit_decision(&self, event: &DecisionEvent) {
        self.emit(|h| h.on_decision(event));
    }

    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
