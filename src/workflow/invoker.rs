//! # Step Invoker
//!
//! Runs one workflow step against a [`StepContext`] and is the single place
//! where the abort signal is caught. Steps that lost an optimistic
//! concurrency race are re-run with the context they started with; any other
//! abort ends the step and, when an error boundary is attached, hands the
//! context (now carrying the problem details) to it. The boundary is retried
//! on conflicts the same way.

use super::abort::{StepResult, WorkflowAbort};
use super::context::StepContext;
use crate::config::StepInvokerConfig;
use crate::constants::events;
use crate::events::EventPublisher;
use crate::logging::log_error;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A unit of work executed by the orchestration engine
#[async_trait]
pub trait WorkflowStep: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, ctx: &mut StepContext) -> StepResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Completed {
        attempts: u32,
    },
    Aborted {
        abort: WorkflowAbort,
        /// Whether the error boundary step itself completed
        compensated: bool,
    },
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Counters over everything this invoker has run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvokerStats {
    pub completed: u64,
    pub aborted: u64,
    pub conflict_retries: u64,
    pub compensations: u64,
}

#[derive(Clone)]
pub struct StepInvoker {
    config: StepInvokerConfig,
    event_publisher: EventPublisher,
    stats: Arc<Mutex<InvokerStats>>,
}

impl StepInvoker {
    pub fn new(config: StepInvokerConfig, event_publisher: EventPublisher) -> Self {
        Self {
            config,
            event_publisher,
            stats: Arc::new(Mutex::new(InvokerStats::default())),
        }
    }

    pub fn stats(&self) -> InvokerStats {
        *self.stats.lock()
    }

    /// Run `step`, retrying `Conflict` aborts; returns the number of attempts taken
    pub async fn invoke(
        &self,
        step: &dyn WorkflowStep,
        ctx: &mut StepContext,
    ) -> Result<u32, WorkflowAbort> {
        match self.run_with_conflict_retries(step, ctx).await {
            Ok(attempts) => {
                self.stats.lock().completed += 1;
                Ok(attempts)
            }
            Err((abort, attempts)) => {
                self.stats.lock().aborted += 1;
                self.event_publisher.publish(
                    events::STEP_ABORTED,
                    json!({
                        "step": step.name(),
                        "error_code": abort.error_code(),
                        "kind": abort.kind(),
                        "message": abort.message(),
                        "attempts": attempts,
                        "job_id": ctx.job_id(),
                    }),
                );
                Err(abort)
            }
        }
    }

    /// Run `step`; on abort run `error_boundary` with the aborted context.
    ///
    /// The boundary gets the same conflict retries as the step, and every
    /// boundary attempt starts from the problem details the step left behind.
    pub async fn invoke_with_error_boundary(
        &self,
        step: &dyn WorkflowStep,
        error_boundary: &dyn WorkflowStep,
        ctx: &mut StepContext,
    ) -> StepOutcome {
        let abort = match self.invoke(step, ctx).await {
            Ok(attempts) => return StepOutcome::Completed { attempts },
            Err(abort) => abort,
        };

        info!(
            step = step.name(),
            error_boundary = error_boundary.name(),
            "Workflow step aborted - running error boundary"
        );

        let compensated = match self.run_with_conflict_retries(error_boundary, ctx).await {
            Ok(_) => {
                self.stats.lock().compensations += 1;
                true
            }
            Err((boundary_abort, _)) => {
                log_error(
                    "step_invoker",
                    "error_boundary",
                    &boundary_abort.to_string(),
                    Some(error_boundary.name()),
                );
                false
            }
        };

        StepOutcome::Aborted { abort, compensated }
    }

    /// Execute `step` until it completes or aborts with something other than
    /// a retryable conflict. Each retry starts from the problem details the
    /// context held on entry.
    async fn run_with_conflict_retries(
        &self,
        step: &dyn WorkflowStep,
        ctx: &mut StepContext,
    ) -> Result<u32, (WorkflowAbort, u32)> {
        let inbound_problem_details = ctx.problem_details().cloned();
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(step = step.name(), attempt = attempts, "Executing workflow step");

            match step.execute(ctx).await {
                Ok(()) => return Ok(attempts),
                Err(abort)
                    if abort.is_retryable() && attempts <= self.config.max_conflict_retries =>
                {
                    warn!(
                        step = step.name(),
                        attempt = attempts,
                        error = %abort,
                        "Workflow step lost a concurrent update - retrying"
                    );
                    match &inbound_problem_details {
                        Some(problem_details) => ctx.set_problem_details(problem_details.clone()),
                        None => {
                            ctx.take_problem_details();
                        }
                    }
                    self.stats.lock().conflict_retries += 1;
                }
                Err(abort) => return Err((abort, attempts)),
            }
        }
    }
}
