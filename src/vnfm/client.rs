use super::types::{CreateVnfRequest, CreateVnfResponse, DeleteVnfResponse, QueryJobResponse};
use crate::models::ProblemDetails;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VnfmClientError {
    /// The adapter answered with an error status, possibly with problem details
    #[error("VNFM adapter returned HTTP {status}")]
    Http {
        status: u16,
        problem_details: Option<ProblemDetails>,
    },

    #[error("VNFM adapter unreachable: {0}")]
    Transport(String),

    #[error("Unable to decode VNFM adapter response: {0}")]
    Decode(String),
}

impl VnfmClientError {
    /// Problem details worth passing through to the job record as-is
    pub fn problem_details(&self) -> Option<&ProblemDetails> {
        match self {
            Self::Http {
                problem_details, ..
            } => problem_details.as_ref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for VnfmClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Client of the SOL003 VNFM adapter.
///
/// `Ok(None)` means the adapter accepted the call but returned no body; the
/// lifecycle task treats that as a failure of the step.
#[async_trait]
pub trait Sol003AdapterServiceProvider: Send + Sync + 'static {
    async fn invoke_create_instantiation_request(
        &self,
        vnf_id: &str,
        request: &CreateVnfRequest,
    ) -> Result<Option<CreateVnfResponse>, VnfmClientError>;

    async fn get_instantiate_operation_job_status(
        &self,
        job_id: &str,
    ) -> Result<Option<QueryJobResponse>, VnfmClientError>;

    async fn invoke_termination_request(
        &self,
        vnf_id: &str,
    ) -> Result<Option<DeleteVnfResponse>, VnfmClientError>;
}
