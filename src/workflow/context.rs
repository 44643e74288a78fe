//! # Step Context
//!
//! Step-local variables handed to the core by the step invoker for one
//! workflow step: identifiers of the job, operation occurrence, NS instance
//! and step instance, plus the problem details of a failure reported by an
//! earlier step or left behind by an abort.
//!
//! The serialized form uses the engine's variable names from
//! [`crate::constants::variables`], so a context can be rebuilt from a JSON
//! variable map:
//!
//! ```rust
//! use nfvo_lcm_core::workflow::StepContext;
//!
//! let ctx = StepContext::from_variables(serde_json::json!({
//!     "jobId": "J1",
//!     "occId": "occ-1",
//!     "nsInstId": "ns-1",
//!     "processInstanceId": "step-1",
//! }))
//! .unwrap();
//!
//! assert_eq!(ctx.job_id(), Some("J1"));
//! assert!(ctx.problem_details().is_none());
//! ```

use crate::models::ProblemDetails;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occ_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ns_inst_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    process_instance_id: Option<String>,
    #[serde(
        default,
        rename = "nsWorkflowProcessingException",
        skip_serializing_if = "Option::is_none"
    )]
    problem_details: Option<ProblemDetails>,
}

impl StepContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a context from the engine's variable map
    pub fn from_variables(variables: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(variables)
    }

    /// Export the context as an engine variable map
    pub fn to_variables(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    #[must_use]
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    #[must_use]
    pub fn with_occ_id(mut self, occ_id: impl Into<String>) -> Self {
        self.occ_id = Some(occ_id.into());
        self
    }

    #[must_use]
    pub fn with_ns_inst_id(mut self, ns_inst_id: impl Into<String>) -> Self {
        self.ns_inst_id = Some(ns_inst_id.into());
        self
    }

    #[must_use]
    pub fn with_process_instance_id(mut self, process_instance_id: impl Into<String>) -> Self {
        self.process_instance_id = Some(process_instance_id.into());
        self
    }

    #[must_use]
    pub fn with_problem_details(mut self, problem_details: ProblemDetails) -> Self {
        self.problem_details = Some(problem_details);
        self
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn occ_id(&self) -> Option<&str> {
        self.occ_id.as_deref()
    }

    pub fn ns_inst_id(&self) -> Option<&str> {
        self.ns_inst_id.as_deref()
    }

    pub fn process_instance_id(&self) -> Option<&str> {
        self.process_instance_id.as_deref()
    }

    pub fn problem_details(&self) -> Option<&ProblemDetails> {
        self.problem_details.as_ref()
    }

    pub fn set_problem_details(&mut self, problem_details: ProblemDetails) {
        self.problem_details = Some(problem_details);
    }

    /// Remove the stored problem details, e.g. before re-running a step
    pub fn take_problem_details(&mut self) -> Option<ProblemDetails> {
        self.problem_details.take()
    }
}
