//! The gate around an external catalog compiler.

use std::sync::Arc;

use catgate_core::config::CatgateConfig;
use catgate_core::errors::{ConfigError, ErrorCode, GateError};
use catgate_core::events::{
    AssertionFailedEvent, DecisionEvent, ErrorEvent, EvaluationStartedEvent, EventDispatcher,
    GateEventHandler,
};
use catgate_core::types::{Catalog, Facts, FactsFormat};
use serde::Serialize;

use super::request::CatalogRequest;
use super::source::CatalogCompiler;
use crate::aggregator::{Decision, ResultAggregator};
use crate::engine::{AssertionEngine, EvaluationReport, ResultStatus};
use crate::generators::GeneratorRegistry;
use crate::resolver::PolicyResolver;

/// Report and decision of one evaluation, for audit callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub report: EvaluationReport,
    pub decision: Decision,
}

/// Wraps a [`CatalogCompiler`]; a catalog only leaves the gate once every
/// applicable assertion passed.
///
/// The gate keeps no per-evaluation state and is `Send + Sync` whenever its
/// compiler is, so concurrent requests can share one gate.
pub struct CompilerGate<C> {
    compiler: C,
    resolver: PolicyResolver,
    engine: AssertionEngine,
    default_facts_format: FactsFormat,
    events: EventDispatcher,
}

impl<C: CatalogCompiler> CompilerGate<C> {
    pub fn new(compiler: C, resolver: PolicyResolver, engine: AssertionEngine) -> Self {
        Self {
            compiler,
            resolver,
            engine,
            default_facts_format: FactsFormat::Json,
            events: EventDispatcher::new(),
        }
    }

    /// Gate configured from a loaded [`CatgateConfig`].
    pub fn from_config(
        compiler: C,
        config: &CatgateConfig,
        registry: Arc<GeneratorRegistry>,
    ) -> Result<Self, ConfigError> {
        let engine = AssertionEngine::from_config(registry, &config.engine)?;
        let mut gate = Self::new(compiler, PolicyResolver::from_config(&config.policy), engine);
        gate.default_facts_format = config.default_facts_format()?;
        Ok(gate)
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn GateEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    pub fn with_default_facts_format(mut self, format: FactsFormat) -> Self {
        self.default_facts_format = format;
        self
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn resolver(&self) -> &PolicyResolver {
        &self.resolver
    }

    pub fn engine(&self) -> &AssertionEngine {
        &self.engine
    }

    /// Decode the request's facts payload.
    pub fn decode_facts(&self, request: &CatalogRequest) -> Result<Facts, GateError> {
        let format = match request.facts_format.as_deref() {
            Some(name) => name.parse::<FactsFormat>()?,
            None => self.default_facts_format,
        };
        Ok(Facts::decode(format, &request.facts)?)
    }

    /// Compile and check the catalog for a request.
    ///
    /// Facts are decoded first; an undecodable payload fails the request
    /// before the compiler is called.
    pub fn find(&self, request: &CatalogRequest) -> Result<Catalog, GateError> {
        let facts = self
            .decode_facts(request)
            .map_err(|e| self.raise(&request.node, e))?;
        let catalog = self
            .compiler
            .compile(request)
            .map_err(|e| self.raise(&request.node, e.into()))?;
        self.check(catalog, &facts)
    }

    /// Return the catalog unchanged if it passes, otherwise
    /// `GateError::PolicyViolation` listing every failure.
    pub fn check(&self, catalog: Catalog, facts: &Facts) -> Result<Catalog, GateError> {
        let evaluation = self.evaluate(&catalog, facts)?;
        match evaluation.decision.into_error() {
            None => Ok(catalog),
            Some(violation) => Err(violation),
        }
    }

    /// Run the full evaluation and hand back report and decision without
    /// rejecting.
    pub fn evaluate(&self, catalog: &Catalog, facts: &Facts) -> Result<Evaluation, GateError> {
        let node = catalog.name.as_str();
        let locations = self
            .resolver
            .resolve(catalog)
            .map_err(|e| self.raise(node, e.into()))?;

        self.events.emit_evaluation_started(&EvaluationStartedEvent {
            node: node.to_string(),
            location_count: locations.len(),
            resource_count: catalog.resources().len(),
        });

        let report = self.engine.run(&locations, catalog, facts);
        for result in report.failures() {
            self.events.emit_assertion_failed(&AssertionFailedEvent {
                node: node.to_string(),
                assertion_id: result.assertion_id.clone(),
                errored: result.status == ResultStatus::Errored,
                detail: result.detail.clone().unwrap_or_default(),
            });
        }

        let decision = ResultAggregator::aggregate(&report);
        tracing::info!(
            node = %node,
            allowed = decision.is_allowed(),
            assertions = report.len(),
            failures = decision.failures().len(),
            "policy decision"
        );
        self.events.emit_decision(&DecisionEvent {
            node: node.to_string(),
            allowed: decision.is_allowed(),
            assertion_count: report.len(),
            failure_count: decision.failures().len(),
        });

        Ok(Evaluation { report, decision })
    }

    fn raise(&self, node: &str, error: GateError) -> GateError {
        tracing::error!(node = %node, error = %error.tagged_string(), "catalog request failed");
        self.events.emit_error(&ErrorEvent {
            node: node.to_string(),
            error_code: error.error_code().to_string(),
            message: error.to_string(),
        });
        error
    }
}

impl<C> std::fmt::Debug for CompilerGate<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilerGate")
            .field("resolver", &self.resolver)
            .field("engine", &self.engine)
            .field("default_facts_format", &self.default_facts_format)
            .field("events", &self.events)
            .finish()
    }
}
