//! In-memory `DatabaseServiceProvider` for development and tests.
//!
//! Records live in `DashMap`s, so concurrent steps for different jobs never
//! contend on a global lock. Compare-and-swap on jobs is done under the
//! map's per-entry lock.

use super::errors::{StorageError, StorageResult};
use super::provider::DatabaseServiceProvider;
use crate::models::{NfvoJob, NfvoNsInst, NsLcmOpOcc};
use crate::state_machine::{NsInstanceState, OperationState, OperationStateMachine};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryDatabaseServiceProvider {
    jobs: DashMap<String, NfvoJob>,
    ns_instances: DashMap<String, NfvoNsInst>,
    op_occs: DashMap<String, NsLcmOpOcc>,
}

impl InMemoryDatabaseServiceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

#[async_trait]
impl DatabaseServiceProvider for InMemoryDatabaseServiceProvider {
    async fn add_job(&self, job: &NfvoJob) -> StorageResult<i64> {
        match self.jobs.entry(job.job_id.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().version != job.version {
                    return Err(StorageError::ConcurrentConflict {
                        entity: "job",
                        id: job.job_id.clone(),
                        expected_version: job.version,
                    });
                }
                let mut stored = job.clone();
                stored.version = job.version + 1;
                let version = stored.version;
                entry.insert(stored);
                debug!(job_id = %job.job_id, version, "Updated job");
                Ok(version)
            }
            Entry::Vacant(entry) => {
                if job.version != 0 {
                    return Err(StorageError::not_found("job", job.job_id.clone()));
                }
                let mut stored = job.clone();
                stored.version = 1;
                entry.insert(stored);
                debug!(job_id = %job.job_id, "Inserted job");
                Ok(1)
            }
        }
    }

    async fn get_job(&self, job_id: &str) -> StorageResult<Option<NfvoJob>> {
        Ok(self.jobs.get(job_id).map(|job| job.value().clone()))
    }

    async fn add_ns_instance(&self, ns_inst: &NfvoNsInst) -> StorageResult<()> {
        self.ns_instances
            .insert(ns_inst.ns_inst_id.clone(), ns_inst.clone());
        Ok(())
    }

    async fn get_ns_instance(&self, ns_inst_id: &str) -> StorageResult<Option<NfvoNsInst>> {
        Ok(self
            .ns_instances
            .get(ns_inst_id)
            .map(|inst| inst.value().clone()))
    }

    async fn update_ns_instance_state(
        &self,
        ns_inst_id: &str,
        state: NsInstanceState,
    ) -> StorageResult<bool> {
        match self.ns_instances.get_mut(ns_inst_id) {
            Some(mut inst) => {
                inst.status = state;
                inst.status_updated_time = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_ns_lcm_op_occ(&self, occ: &NsLcmOpOcc) -> StorageResult<()> {
        match self.op_occs.entry(occ.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists {
                entity: "ns_lcm_op_occ",
                id: occ.id.clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(occ.clone());
                Ok(())
            }
        }
    }

    async fn get_ns_lcm_op_occ(&self, occ_id: &str) -> StorageResult<Option<NsLcmOpOcc>> {
        Ok(self.op_occs.get(occ_id).map(|occ| occ.value().clone()))
    }

    async fn update_ns_lcm_op_occ_operation_state(
        &self,
        occ_id: &str,
        state: OperationState,
    ) -> StorageResult<bool> {
        let Some(mut occ) = self.op_occs.get_mut(occ_id) else {
            return Ok(false);
        };

        if !OperationStateMachine::can_transition(occ.operation_state, state) {
            debug!(
                occ_id,
                from = %occ.operation_state,
                to = %state,
                "Rejected operation state update"
            );
            return Ok(false);
        }

        occ.operation_state = state;
        occ.state_entered_time = Utc::now();
        Ok(true)
    }
}
