pub mod common_steps;
pub mod network_service_task;

pub use common_steps::{
    SetJobStatusStep, SetJobStatusToErrorStep, UpdateNsInstanceStatusStep,
    UpdateOperationStateStep,
};
pub use network_service_task::NetworkServiceTask;
