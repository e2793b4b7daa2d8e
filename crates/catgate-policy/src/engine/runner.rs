//! Runs every static and generated assertion against one catalog.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use catgate_core::config::EngineConfig;
use catgate_core::errors::{AssertionError, ConfigError};
use catgate_core::types::{Catalog, Facts};
use rayon::prelude::*;

use super::context::ExecutionContext;
use super::loader::{load_location, WorkItem};
use super::report::{EvaluationReport, EvaluationResult, ResultStatus};
use crate::assertions::{evaluate, Assertion, AssertionOrigin};
use crate::generators::GeneratorRegistry;
use crate::resolver::RuleSetLocation;

/// Assertion execution engine.
///
/// Holds only the generator registry and execution settings; every call to
/// [`AssertionEngine::run`] builds and drops its own execution context, so
/// one engine can serve concurrent evaluations.
pub struct AssertionEngine {
    registry: Arc<GeneratorRegistry>,
    parallel: bool,
    pool: Option<rayon::ThreadPool>,
}

impl AssertionEngine {
    /// Sequential engine over the given registry.
    pub fn new(registry: Arc<GeneratorRegistry>) -> Self {
        Self {
            registry,
            parallel: false,
            pool: None,
        }
    }

    /// Engine configured from `[engine]`. A dedicated pool is only built
    /// when a thread count is given; otherwise rayon's global pool is used.
    pub fn from_config(
        registry: Arc<GeneratorRegistry>,
        config: &EngineConfig,
    ) -> Result<Self, ConfigError> {
        let parallel = config.effective_parallel();
        let pool = match config.threads {
            Some(threads) if parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("catgate-eval-{i}"))
                    .build()
                    .map_err(|e| ConfigError::InvalidValue {
                        field: "engine.threads".to_string(),
                        message: e.to_string(),
                    })?,
            ),
            _ => None,
        };
        Ok(Self {
            registry,
            parallel,
            pool,
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Static assertions of every location (in location order), then
    /// generated assertions in resource declaration order.
    pub fn collect(&self, locations: &[RuleSetLocation], catalog: &Catalog) -> Vec<WorkItem> {
        let mut items: Vec<WorkItem> = locations.iter().flat_map(load_location).collect();

        for resource in catalog.resources() {
            match self.registry.generate(resource) {
                Ok(generated) => items.extend(generated.into_iter().map(WorkItem::Execute)),
                Err(failure) => {
                    tracing::warn!(
                        generator = %failure.generator,
                        resource = %failure.resource,
                        error = %failure.error,
                        "assertion generator failed"
                    );
                    items.push(WorkItem::Record(failure.into_result()));
                }
            }
        }

        items
    }

    /// Execute every assertion exactly once and report one result each.
    /// Nothing short-circuits; a failing or panicking assertion only
    /// affects its own result.
    pub fn run(
        &self,
        locations: &[RuleSetLocation],
        catalog: &Catalog,
        facts: &Facts,
    ) -> EvaluationReport {
        let span = tracing::info_span!(
            "policy_evaluation",
            node = %catalog.name,
            locations = locations.len()
        );
        let _guard = span.enter();
        let started = Instant::now();

        let items = self.collect(locations, catalog);
        let ctx = ExecutionContext::new(catalog, facts);

        let results: Vec<EvaluationResult> = if self.parallel {
            let execute_all = || -> Vec<EvaluationResult> {
                items
                    .into_par_iter()
                    .map(|item| execute(item, &ctx))
                    .collect()
            };
            match &self.pool {
                Some(pool) => pool.install(execute_all),
                None => execute_all(),
            }
        } else {
            items.into_iter().map(|item| execute(item, &ctx)).collect()
        };

        let report = EvaluationReport::new(results);
        tracing::info!(
            assertions = report.len(),
            passed = report.count(ResultStatus::Passed),
            failed = report.count(ResultStatus::Failed),
            errored = report.count(ResultStatus::Errored),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "policy evaluation complete"
        );
        report
    }
}

impl std::fmt::Debug for AssertionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionEngine")
            .field("registry", &self.registry)
            .field("parallel", &self.parallel)
            .field("threads", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}

fn execute(item: WorkItem, ctx: &ExecutionContext<'_>) -> EvaluationResult {
    match item {
        WorkItem::Execute(assertion) => execute_assertion(&assertion, ctx),
        WorkItem::Record(result) => result,
    }
}

/// Run one assertion, capturing predicate errors and panics as errored
/// results.
pub fn execute_assertion(assertion: &Assertion, ctx: &ExecutionContext<'_>) -> EvaluationResult {
    let ctx = match &assertion.origin {
        AssertionOrigin::Generated { resource, .. } => ctx.with_source(resource),
        AssertionOrigin::Static { .. } => *ctx,
    };
    let outcome = catch_unwind(AssertUnwindSafe(|| evaluate(&assertion.check, &ctx)))
        .unwrap_or_else(|payload| Err(AssertionError::Panicked(panic_message(payload))));

    match outcome {
        Ok(outcome) if outcome.holds(assertion.check.negate) => EvaluationResult::passed(assertion),
        Ok(outcome) => EvaluationResult::failed(
            assertion,
            format!(
                "{}: {} ({})",
                assertion.id,
                assertion.check.expectation(),
                outcome.observed
            ),
        ),
        Err(e) => EvaluationResult::errored(assertion, format!("{}: {}", assertion.id, e)),
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
