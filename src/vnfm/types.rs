//! Request and response bodies exchanged with the SOL003 VNFM adapter.

use crate::models::ProblemDetails;
use crate::utils::serde::option_offset_date_time;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cloud placement of the VNF being created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub cloud_owner: String,
    pub region_name: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnfRequest {
    pub name: String,
    pub tenant: Tenant,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub additional_params: HashMap<String, serde_json::Value>,
}

impl CreateVnfRequest {
    pub fn new(name: impl Into<String>, tenant: Tenant) -> Self {
        Self {
            name: name.into(),
            tenant,
            additional_params: HashMap::new(),
        }
    }
}

/// Accepted create/instantiate request; `job_id` names the adapter-side job to poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnfResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVnfResponse {
    pub job_id: String,
}

/// Lifecycle operation state reported by the VNFM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VnfOperationState {
    Starting,
    Processing,
    Completed,
    FailedTemp,
    Failed,
    RollingBack,
    RolledBack,
}

impl VnfOperationState {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedTemp | Self::Failed | Self::RolledBack)
    }
}

/// Whether the adapter could reach the VNFM when answering a status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatusRetrievalStatus {
    StatusFound,
    OperationNotFound,
    WaitingForStatus,
    CannotRetrieveStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryJobResponse {
    pub id: String,
    #[serde(default)]
    pub operation_state: Option<VnfOperationState>,
    #[serde(default)]
    pub operation_status_retrieval_status: Option<OperationStatusRetrievalStatus>,
    #[serde(default, with = "option_offset_date_time")]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "option_offset_date_time")]
    pub state_entered_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProblemDetails>,
}
