//! # VNFM Adapter Client
//!
//! The SOL003 adapter interface the lifecycle workflows call to create,
//! instantiate and terminate VNFs, its wire types, and the step-level task
//! that funnels adapter failures into the abort protocol.

pub mod client;
pub mod lifecycle_task;
pub mod types;

pub use client::{Sol003AdapterServiceProvider, VnfmClientError};
pub use lifecycle_task::{VnfmJobProgress, VnfmLifecycleTask};
pub use types::{
    CreateVnfRequest, CreateVnfResponse, DeleteVnfResponse, OperationStatusRetrievalStatus,
    QueryJobResponse, Tenant, VnfOperationState,
};
