use crate::constants::events;
use crate::database::DatabaseServiceProvider;
use crate::events::EventPublisher;
use crate::logging::log_occurrence_operation;
use crate::state_machine::OperationState;
use crate::workflow::abort::abort_as;
use crate::workflow::{AbortKind, StepContext, StepResult};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Conditional updates of an `NsLcmOpOcc`'s operation state.
///
/// The occurrence is named by the `occId` context variable. A write that does
/// not take effect aborts the step; the job status is left alone.
#[derive(Clone)]
pub struct OperationOccurrenceManager {
    provider: Arc<dyn DatabaseServiceProvider>,
    event_publisher: EventPublisher,
}

impl OperationOccurrenceManager {
    pub fn new(provider: Arc<dyn DatabaseServiceProvider>, event_publisher: EventPublisher) -> Self {
        Self {
            provider,
            event_publisher,
        }
    }

    pub async fn transition_operation_state(
        &self,
        ctx: &mut StepContext,
        new_state: OperationState,
    ) -> StepResult<()> {
        let Some(occ_id) = ctx.occ_id().map(str::to_string) else {
            return Err(abort_as(
                ctx,
                AbortKind::NotFound,
                "No NsLcmOpOcc id found in step context",
            ));
        };

        info!(occ_id = %occ_id, operation_state = %new_state, "Updating NsLcmOpOcc operationState");

        let rejected = || {
            format!("Unable to update NsLcmOpOcc {occ_id} operationState to {new_state} in database")
        };

        match self
            .provider
            .update_ns_lcm_op_occ_operation_state(&occ_id, new_state)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Err(abort_as(ctx, AbortKind::WriteRejected, rejected())),
            Err(err) => {
                return Err(abort_as(
                    ctx,
                    AbortKind::StorageUnavailable,
                    format!("{}: {err}", rejected()),
                ))
            }
        }

        log_occurrence_operation(
            "transition_operation_state",
            Some(&occ_id),
            new_state.as_str(),
            None,
        );
        self.event_publisher.publish(
            events::OPERATION_STATE_CHANGED,
            json!({
                "occ_id": occ_id,
                "operation_state": new_state,
            }),
        );

        Ok(())
    }

    pub async fn complete(&self, ctx: &mut StepContext) -> StepResult<()> {
        self.transition_operation_state(ctx, OperationState::Completed)
            .await
    }

    pub async fn fail(&self, ctx: &mut StepContext) -> StepResult<()> {
        self.transition_operation_state(ctx, OperationState::Failed)
            .await
    }
}
