pub mod workflow;

pub use workflow::{TransactionWorkflow, WorkflowError, WorkflowResult};
