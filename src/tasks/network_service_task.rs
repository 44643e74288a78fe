use crate::database::DatabaseServiceProvider;
use crate::events::EventPublisher;
use crate::models::{NfvoJob, NfvoNsInst};
use crate::services::{
    JobStateManager, MarkErrorOutcome, NsInstanceAccessor, OperationOccurrenceManager,
};
use crate::state_machine::{JobStatus, NsInstanceState};
use crate::workflow::{StepContext, StepResult};
use std::sync::Arc;
use tracing::info;

/// Per-step entry point bundling the lifecycle services over one provider.
///
/// Concrete NS workflow steps hold one of these and call the operation the
/// step stands for. Cloning is cheap; all clones share the provider and the
/// event channel.
#[derive(Clone)]
pub struct NetworkServiceTask {
    jobs: JobStateManager,
    occurrences: OperationOccurrenceManager,
    ns_instances: NsInstanceAccessor,
}

impl NetworkServiceTask {
    pub fn new(provider: Arc<dyn DatabaseServiceProvider>, event_publisher: EventPublisher) -> Self {
        Self {
            jobs: JobStateManager::new(provider.clone(), event_publisher.clone()),
            occurrences: OperationOccurrenceManager::new(provider.clone(), event_publisher.clone()),
            ns_instances: NsInstanceAccessor::new(provider, event_publisher),
        }
    }

    pub fn jobs(&self) -> &JobStateManager {
        &self.jobs
    }

    pub fn occurrences(&self) -> &OperationOccurrenceManager {
        &self.occurrences
    }

    pub fn ns_instances(&self) -> &NsInstanceAccessor {
        &self.ns_instances
    }

    pub async fn add_job_status(
        &self,
        ctx: &mut StepContext,
        status: JobStatus,
        description: &str,
    ) -> StepResult<()> {
        self.jobs.record_status(ctx, status, description).await
    }

    pub async fn set_job_status(
        &self,
        ctx: &mut StepContext,
        status: JobStatus,
        description: &str,
    ) -> StepResult<NfvoJob> {
        self.jobs.transition_to(ctx, status, description).await
    }

    pub async fn set_job_status_to_error(
        &self,
        ctx: &mut StepContext,
        description: &str,
    ) -> StepResult<MarkErrorOutcome> {
        self.jobs.mark_error(ctx, description).await
    }

    pub async fn update_ns_lcm_op_occ_status_to_completed(
        &self,
        ctx: &mut StepContext,
    ) -> StepResult<()> {
        info!("Executing update_ns_lcm_op_occ_status_to_completed ...");
        self.occurrences.complete(ctx).await
    }

    pub async fn update_ns_lcm_op_occ_status_to_failed(&self, ctx: &mut StepContext) -> StepResult<()> {
        info!("Executing update_ns_lcm_op_occ_status_to_failed ...");
        self.occurrences.fail(ctx).await
    }

    pub async fn update_ns_instance_status(
        &self,
        ctx: &mut StepContext,
        state: NsInstanceState,
    ) -> StepResult<()> {
        self.ns_instances.update_state(ctx, state).await
    }

    pub async fn get_nfvo_ns_inst(
        &self,
        ctx: &mut StepContext,
        ns_inst_id: Option<&str>,
    ) -> StepResult<NfvoNsInst> {
        self.ns_instances.get_or_abort(ctx, ns_inst_id).await
    }
}
