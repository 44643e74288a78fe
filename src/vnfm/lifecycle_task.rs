//! # VNFM Lifecycle Task
//!
//! Workflow-step operations that drive VNF lifecycle calls through the
//! SOL003 adapter. Each call records progress on the job; anything other
//! than a usable response aborts the step, passing the adapter's problem
//! details through when it supplied them.

use super::client::{Sol003AdapterServiceProvider, VnfmClientError};
use super::types::{CreateVnfRequest, VnfOperationState};
use crate::services::JobStateManager;
use crate::state_machine::JobStatus;
use crate::workflow::{abort, abort_with_problem_details, StepContext, StepResult, WorkflowAbort};
use std::sync::Arc;
use tracing::{debug, info};

/// Progress of an adapter-side job as seen by a polling step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VnfmJobProgress {
    InProgress(Option<VnfOperationState>),
    Completed,
}

#[derive(Clone)]
pub struct VnfmLifecycleTask {
    client: Arc<dyn Sol003AdapterServiceProvider>,
    job_manager: JobStateManager,
}

impl VnfmLifecycleTask {
    pub fn new(client: Arc<dyn Sol003AdapterServiceProvider>, job_manager: JobStateManager) -> Self {
        Self {
            client,
            job_manager,
        }
    }

    /// Ask the adapter to create and instantiate `vnf_id`; returns the adapter job id to poll
    pub async fn create_and_instantiate_vnf(
        &self,
        ctx: &mut StepContext,
        vnf_id: &str,
        request: &CreateVnfRequest,
    ) -> StepResult<String> {
        info!(vnf_id, name = %request.name, "Invoking SOL003 adapter for VNF creation");
        self.job_manager
            .record_status(
                ctx,
                JobStatus::Processing,
                &format!("Invoking SOL003 adapter for creating and instantiating VNF: {vnf_id}"),
            )
            .await?;

        match self
            .client
            .invoke_create_instantiation_request(vnf_id, request)
            .await
        {
            Ok(Some(response)) => {
                debug!(vnf_id, vnfm_job_id = %response.job_id, "VNF instantiation accepted");
                Ok(response.job_id)
            }
            Ok(None) => Err(abort(
                ctx,
                format!("Unable to invoke instantiation request for VNF: {vnf_id}"),
            )),
            Err(err) => Err(abort_on_client_error(
                ctx,
                &err,
                format!("Instantiation request for VNF {vnf_id} failed"),
            )),
        }
    }

    /// Poll the adapter job created by [`Self::create_and_instantiate_vnf`]
    pub async fn check_instantiation_status(
        &self,
        ctx: &mut StepContext,
        vnfm_job_id: &str,
    ) -> StepResult<VnfmJobProgress> {
        let response = match self
            .client
            .get_instantiate_operation_job_status(vnfm_job_id)
            .await
        {
            Ok(Some(response)) => response,
            Ok(None) => {
                return Err(abort(
                    ctx,
                    format!("Unable to retrieve status of VNFM job: {vnfm_job_id}"),
                ))
            }
            Err(err) => {
                return Err(abort_on_client_error(
                    ctx,
                    &err,
                    format!("Status query for VNFM job {vnfm_job_id} failed"),
                ))
            }
        };

        match response.operation_state {
            Some(VnfOperationState::Completed) => {
                self.job_manager
                    .record_status(
                        ctx,
                        JobStatus::Processing,
                        &format!("VNFM job {vnfm_job_id} completed"),
                    )
                    .await?;
                Ok(VnfmJobProgress::Completed)
            }
            Some(state) if state.is_failure() => {
                let message = format!("VNFM job {vnfm_job_id} finished with operation state {state:?}");
                Err(match response.error {
                    Some(problem_details) => abort_with_problem_details(ctx, message, problem_details),
                    None => abort(ctx, message),
                })
            }
            state => {
                debug!(vnfm_job_id, ?state, "VNFM job still running");
                Ok(VnfmJobProgress::InProgress(state))
            }
        }
    }

    /// Ask the adapter to terminate and delete `vnf_id`; returns the adapter job id
    pub async fn terminate_vnf(&self, ctx: &mut StepContext, vnf_id: &str) -> StepResult<String> {
        self.job_manager
            .record_status(
                ctx,
                JobStatus::Processing,
                &format!("Invoking SOL003 adapter for terminating VNF: {vnf_id}"),
            )
            .await?;

        match self.client.invoke_termination_request(vnf_id).await {
            Ok(Some(response)) => Ok(response.job_id),
            Ok(None) => Err(abort(
                ctx,
                format!("Unable to invoke termination request for VNF: {vnf_id}"),
            )),
            Err(err) => Err(abort_on_client_error(
                ctx,
                &err,
                format!("Termination request for VNF {vnf_id} failed"),
            )),
        }
    }
}

fn abort_on_client_error(
    ctx: &mut StepContext,
    err: &VnfmClientError,
    message: String,
) -> WorkflowAbort {
    let message = format!("{message}: {err}");
    match err.problem_details() {
        Some(problem_details) => abort_with_problem_details(ctx, message, problem_details.clone()),
        None => abort(ctx, message),
    }
}
