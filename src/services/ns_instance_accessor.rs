use crate::constants::events;
use crate::database::DatabaseServiceProvider;
use crate::events::EventPublisher;
use crate::models::NfvoNsInst;
use crate::state_machine::NsInstanceState;
use crate::workflow::abort::{abort_as, abort_on_storage_error};
use crate::workflow::{AbortKind, StepContext, StepResult};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Reads and writes the lifecycle state of NS instances.
///
/// State writes are unconditional: the NS instance state has no transition
/// table of its own.
#[derive(Clone)]
pub struct NsInstanceAccessor {
    provider: Arc<dyn DatabaseServiceProvider>,
    event_publisher: EventPublisher,
}

impl NsInstanceAccessor {
    pub fn new(provider: Arc<dyn DatabaseServiceProvider>, event_publisher: EventPublisher) -> Self {
        Self {
            provider,
            event_publisher,
        }
    }

    /// Persist `new_state` for the NS instance named by `nsInstId`
    pub async fn update_state(
        &self,
        ctx: &mut StepContext,
        new_state: NsInstanceState,
    ) -> StepResult<()> {
        let ns_inst_id = self.resolve_id(ctx, None)?;
        info!(ns_inst_id = %ns_inst_id, state = %new_state, "Updating NfvoNsInst status");

        match self
            .provider
            .update_ns_instance_state(&ns_inst_id, new_state)
            .await
        {
            Ok(true) => {
                self.event_publisher.publish(
                    events::NS_INSTANCE_STATE_CHANGED,
                    json!({
                        "ns_inst_id": ns_inst_id,
                        "state": new_state,
                    }),
                );
                Ok(())
            }
            Ok(false) => Err(abort_as(
                ctx,
                AbortKind::NotFound,
                not_found_message(&ns_inst_id),
            )),
            Err(err) => Err(abort_on_storage_error(
                ctx,
                &err,
                format!("Unable to update NfvoNsInst {ns_inst_id} status to {new_state}"),
            )),
        }
    }

    /// Load an NS instance, taking the id from `ns_inst_id` or else from the context
    pub async fn get_or_abort(
        &self,
        ctx: &mut StepContext,
        ns_inst_id: Option<&str>,
    ) -> StepResult<NfvoNsInst> {
        let ns_inst_id = self.resolve_id(ctx, ns_inst_id)?;

        match self.provider.get_ns_instance(&ns_inst_id).await {
            Ok(Some(ns_inst)) => Ok(ns_inst),
            Ok(None) => Err(abort_as(
                ctx,
                AbortKind::NotFound,
                not_found_message(&ns_inst_id),
            )),
            Err(err) => Err(abort_on_storage_error(
                ctx,
                &err,
                format!("Unable to load NfvoNsInst {ns_inst_id}"),
            )),
        }
    }

    fn resolve_id(&self, ctx: &mut StepContext, explicit: Option<&str>) -> StepResult<String> {
        match explicit.or(ctx.ns_inst_id()).map(str::to_string) {
            Some(id) => Ok(id),
            None => Err(abort_as(
                ctx,
                AbortKind::NotFound,
                "No NS Instance id found in step context",
            )),
        }
    }
}

fn not_found_message(ns_inst_id: &str) -> String {
    format!("Unable to find NS Instance in database using id: {ns_inst_id}")
}
