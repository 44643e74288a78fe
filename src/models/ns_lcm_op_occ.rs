//! # NS LCM Operation Occurrence Model
//!
//! One lifecycle-management action (instantiate, terminate, ...) against a
//! network service instance, tracked with its own narrow operation state and
//! independent from the job that carries it out.

use crate::state_machine::OperationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NsLcmOpType {
    Instantiate,
    Scale,
    Update,
    Terminate,
    Heal,
}

impl NsLcmOpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instantiate => "INSTANTIATE",
            Self::Scale => "SCALE",
            Self::Update => "UPDATE",
            Self::Terminate => "TERMINATE",
            Self::Heal => "HEAL",
        }
    }
}

impl fmt::Display for NsLcmOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NsLcmOpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSTANTIATE" => Ok(Self::Instantiate),
            "SCALE" => Ok(Self::Scale),
            "UPDATE" => Ok(Self::Update),
            "TERMINATE" => Ok(Self::Terminate),
            "HEAL" => Ok(Self::Heal),
            _ => Err(format!("Invalid NS LCM operation type: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NsLcmOpOcc {
    pub id: String,
    pub ns_instance_id: String,
    pub operation: NsLcmOpType,
    pub operation_state: OperationState,
    pub state_entered_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub is_auto_invocation: bool,
}

impl NsLcmOpOcc {
    pub fn new(ns_instance_id: impl Into<String>, operation: NsLcmOpType) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), ns_instance_id, operation)
    }

    pub fn with_id(
        id: impl Into<String>,
        ns_instance_id: impl Into<String>,
        operation: NsLcmOpType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            ns_instance_id: ns_instance_id.into(),
            operation,
            operation_state: OperationState::Starting,
            state_entered_time: now,
            start_time: now,
            is_auto_invocation: false,
        }
    }
}
