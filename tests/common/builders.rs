use nfvo_lcm_core::database::{DatabaseServiceProvider, InMemoryDatabaseServiceProvider};
use nfvo_lcm_core::events::EventPublisher;
use nfvo_lcm_core::models::{JobAction, NfvoJob, NfvoNsInst, NsLcmOpOcc, NsLcmOpType};
use nfvo_lcm_core::state_machine::JobStatus;
use nfvo_lcm_core::tasks::NetworkServiceTask;
use std::sync::Arc;

/// In-memory provider plus a task facade wired to it
pub struct Fixture {
    pub provider: Arc<InMemoryDatabaseServiceProvider>,
    pub events: EventPublisher,
    pub task: NetworkServiceTask,
}

impl Fixture {
    pub fn new() -> Self {
        let provider = Arc::new(InMemoryDatabaseServiceProvider::new());
        let events = EventPublisher::new(64);
        let task = NetworkServiceTask::new(provider.clone(), events.clone());
        Self {
            provider,
            events,
            task,
        }
    }

    pub async fn with_job(self, job_id: &str, status: JobStatus) -> Self {
        self.provider
            .add_job(&NfvoJob::with_status(
                job_id,
                JobAction::Instantiate,
                "ns-1",
                status,
            ))
            .await
            .expect("seed job");
        self
    }

    pub async fn with_occurrence(self, occ_id: &str) -> Self {
        self.provider
            .add_ns_lcm_op_occ(&NsLcmOpOcc::with_id(occ_id, "ns-1", NsLcmOpType::Instantiate))
            .await
            .expect("seed occurrence");
        self
    }

    pub async fn with_ns_instance(self, ns_inst_id: &str) -> Self {
        self.provider
            .add_ns_instance(&NfvoNsInst::new(ns_inst_id, "vCPE").ns_package_id("pkg-1"))
            .await
            .expect("seed ns instance");
        self
    }

    pub async fn job(&self, job_id: &str) -> NfvoJob {
        self.provider
            .get_job(job_id)
            .await
            .expect("storage available")
            .expect("job exists")
    }
}
