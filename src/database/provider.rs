use super::errors::StorageResult;
use crate::models::{NfvoJob, NfvoNsInst, NsLcmOpOcc};
use crate::state_machine::{NsInstanceState, OperationState};
use async_trait::async_trait;

/// Persistence capability consumed by the job/operation core.
///
/// Lookups return `Ok(None)` for missing records so each caller decides how a
/// miss is handled. Conditional updates report through their `bool` whether
/// the write took effect.
///
/// ## Job writes
///
/// `add_job` is a compare-and-swap on [`NfvoJob::version`]: a job whose
/// version is `0` is inserted, any other job is written only if the stored
/// version still equals `job.version`. The new stored version is returned.
/// A lost race yields [`StorageError::ConcurrentConflict`].
///
/// Implementations must be `Send + Sync + 'static` so one provider can be
/// shared by every concurrently running step.
///
/// [`StorageError::ConcurrentConflict`]: super::StorageError::ConcurrentConflict
#[async_trait]
pub trait DatabaseServiceProvider: Send + Sync + 'static {
    /// Insert or compare-and-swap a job together with its status history
    async fn add_job(&self, job: &NfvoJob) -> StorageResult<i64>;

    async fn get_job(&self, job_id: &str) -> StorageResult<Option<NfvoJob>>;

    async fn add_ns_instance(&self, ns_inst: &NfvoNsInst) -> StorageResult<()>;

    async fn get_ns_instance(&self, ns_inst_id: &str) -> StorageResult<Option<NfvoNsInst>>;

    /// Unconditionally overwrite the lifecycle state; `false` when the instance is missing
    async fn update_ns_instance_state(
        &self,
        ns_inst_id: &str,
        state: NsInstanceState,
    ) -> StorageResult<bool>;

    async fn add_ns_lcm_op_occ(&self, occ: &NsLcmOpOcc) -> StorageResult<()>;

    async fn get_ns_lcm_op_occ(&self, occ_id: &str) -> StorageResult<Option<NsLcmOpOcc>>;

    /// Conditionally move an occurrence to `state`; `false` when the
    /// occurrence is missing or its current state does not allow the move
    async fn update_ns_lcm_op_occ_operation_state(
        &self,
        occ_id: &str,
        state: OperationState,
    ) -> StorageResult<bool>;
}
