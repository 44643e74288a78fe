//! # Workflow Integration
//!
//! What a workflow step sees of the core: the step-local [`StepContext`],
//! the abort protocol that unwinds a failing step, and the [`StepInvoker`]
//! that runs steps and catches the abort signal.

pub mod abort;
pub mod context;
pub mod invoker;

pub use abort::{abort, abort_with_problem_details, AbortKind, StepResult, WorkflowAbort};
pub use context::StepContext;
pub use invoker::{InvokerStats, StepInvoker, StepOutcome, WorkflowStep};
