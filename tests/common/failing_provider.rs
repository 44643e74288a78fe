use async_trait::async_trait;
use nfvo_lcm_core::database::{
    DatabaseServiceProvider, InMemoryDatabaseServiceProvider, StorageError, StorageResult,
};
use nfvo_lcm_core::models::{NfvoJob, NfvoNsInst, NsLcmOpOcc};
use nfvo_lcm_core::state_machine::{NsInstanceState, OperationState};
use parking_lot::Mutex;

/// Which writes the provider should refuse
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureMode {
    /// Occurrence updates report that the write did not take effect
    pub reject_occurrence_updates: bool,
    /// Job writes fail with a backend error
    pub fail_job_writes: bool,
    /// The next N job writes lose an optimistic concurrency race
    pub job_conflicts: u32,
}

/// Wraps the in-memory provider and injects storage failures
#[derive(Default)]
pub struct FailingProvider {
    pub inner: InMemoryDatabaseServiceProvider,
    mode: Mutex<FailureMode>,
}

impl FailingProvider {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            inner: InMemoryDatabaseServiceProvider::new(),
            mode: Mutex::new(mode),
        }
    }

    pub fn set_mode(&self, mode: FailureMode) {
        *self.mode.lock() = mode;
    }
}

#[async_trait]
impl DatabaseServiceProvider for FailingProvider {
    async fn add_job(&self, job: &NfvoJob) -> StorageResult<i64> {
        {
            let mut mode = self.mode.lock();
            if mode.fail_job_writes {
                return Err(StorageError::Backend("connection reset".into()));
            }
            if mode.job_conflicts > 0 {
                mode.job_conflicts -= 1;
                return Err(StorageError::ConcurrentConflict {
                    entity: "job",
                    id: job.job_id.clone(),
                    expected_version: job.version,
                });
            }
        }
        self.inner.add_job(job).await
    }

    async fn get_job(&self, job_id: &str) -> StorageResult<Option<NfvoJob>> {
        self.inner.get_job(job_id).await
    }

    async fn add_ns_instance(&self, ns_inst: &NfvoNsInst) -> StorageResult<()> {
        self.inner.add_ns_instance(ns_inst).await
    }

    async fn get_ns_instance(&self, ns_inst_id: &str) -> StorageResult<Option<NfvoNsInst>> {
        self.inner.get_ns_instance(ns_inst_id).await
    }

    async fn update_ns_instance_state(
        &self,
        ns_inst_id: &str,
        state: NsInstanceState,
    ) -> StorageResult<bool> {
        self.inner.update_ns_instance_state(ns_inst_id, state).await
    }

    async fn add_ns_lcm_op_occ(&self, occ: &NsLcmOpOcc) -> StorageResult<()> {
        self.inner.add_ns_lcm_op_occ(occ).await
    }

    async fn get_ns_lcm_op_occ(&self, occ_id: &str) -> StorageResult<Option<NsLcmOpOcc>> {
        self.inner.get_ns_lcm_op_occ(occ_id).await
    }

    async fn update_ns_lcm_op_occ_operation_state(
        &self,
        occ_id: &str,
        state: OperationState,
    ) -> StorageResult<bool> {
        if self.mode.lock().reject_occurrence_updates {
            return Ok(false);
        }
        self.inner
            .update_ns_lcm_op_occ_operation_state(occ_id, state)
            .await
    }
}
