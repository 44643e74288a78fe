//! # NS Instance Model
//!
//! Managed network service instance targeted by lifecycle operations. The core
//! only reads it and rewrites its coarse lifecycle state.

use crate::state_machine::NsInstanceState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfvoNsInst {
    pub ns_inst_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ns_package_id: Option<String>,
    pub status: NsInstanceState,
    pub status_updated_time: DateTime<Utc>,
}

impl NfvoNsInst {
    pub fn new(ns_inst_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ns_inst_id: ns_inst_id.into(),
            name: name.into(),
            description: None,
            ns_package_id: None,
            status: NsInstanceState::NotInstantiated,
            status_updated_time: Utc::now(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ns_package_id(mut self, ns_package_id: impl Into<String>) -> Self {
        self.ns_package_id = Some(ns_package_id.into());
        self
    }
}
