//! Framework-agnostic domain types.

pub mod status;
pub mod transaction;

pub use status::{ParseStatusError, Status};
pub use transaction::{Transaction, TransactionUpdate};
