//! Reusable workflow steps that wrap a single [`NetworkServiceTask`] operation.

use super::network_service_task::NetworkServiceTask;
use crate::services::MarkErrorOutcome;
use crate::state_machine::{JobStatus, NsInstanceState, OperationState};
use crate::workflow::{StepContext, StepResult, WorkflowStep};
use async_trait::async_trait;
use tracing::{info, warn};

/// Moves the job to a fixed status
pub struct SetJobStatusStep {
    task: NetworkServiceTask,
    status: JobStatus,
    description: String,
}

impl SetJobStatusStep {
    pub fn new(task: NetworkServiceTask, status: JobStatus, description: impl Into<String>) -> Self {
        Self {
            task,
            status,
            description: description.into(),
        }
    }
}

#[async_trait]
impl WorkflowStep for SetJobStatusStep {
    fn name(&self) -> &str {
        "set_job_status"
    }

    async fn execute(&self, ctx: &mut StepContext) -> StepResult<()> {
        self.task
            .set_job_status(ctx, self.status, &self.description)
            .await
            .map(|_| ())
    }
}

pub struct UpdateOperationStateStep {
    task: NetworkServiceTask,
    state: OperationState,
}

impl UpdateOperationStateStep {
    pub fn new(task: NetworkServiceTask, state: OperationState) -> Self {
        Self { task, state }
    }
}

#[async_trait]
impl WorkflowStep for UpdateOperationStateStep {
    fn name(&self) -> &str {
        "update_ns_lcm_op_occ_operation_state"
    }

    async fn execute(&self, ctx: &mut StepContext) -> StepResult<()> {
        self.task
            .occurrences()
            .transition_operation_state(ctx, self.state)
            .await
    }
}

pub struct UpdateNsInstanceStatusStep {
    task: NetworkServiceTask,
    state: NsInstanceState,
}

impl UpdateNsInstanceStatusStep {
    pub fn new(task: NetworkServiceTask, state: NsInstanceState) -> Self {
        Self { task, state }
    }
}

#[async_trait]
impl WorkflowStep for UpdateNsInstanceStatusStep {
    fn name(&self) -> &str {
        "update_ns_instance_status"
    }

    async fn execute(&self, ctx: &mut StepContext) -> StepResult<()> {
        self.task.update_ns_instance_status(ctx, self.state).await
    }
}

/// Error boundary of NS workflows.
///
/// Marks the job `ERROR` (recording the problem details left by the failed
/// step) and, when the context names an operation occurrence, moves it to
/// `FAILED`.
pub struct SetJobStatusToErrorStep {
    task: NetworkServiceTask,
    description: String,
}

impl SetJobStatusToErrorStep {
    pub fn new(task: NetworkServiceTask, description: impl Into<String>) -> Self {
        Self {
            task,
            description: description.into(),
        }
    }
}

#[async_trait]
impl WorkflowStep for SetJobStatusToErrorStep {
    fn name(&self) -> &str {
        "set_job_status_to_error"
    }

    async fn execute(&self, ctx: &mut StepContext) -> StepResult<()> {
        match self.task.set_job_status_to_error(ctx, &self.description).await? {
            MarkErrorOutcome::Marked { entries_added } => {
                info!(entries_added, "Job marked as failed");
            }
            outcome => warn!(?outcome, "Job not marked as failed"),
        }

        if ctx.occ_id().is_some() {
            self.task.update_ns_lcm_op_occ_status_to_failed(ctx).await?;
        }
        Ok(())
    }
}
