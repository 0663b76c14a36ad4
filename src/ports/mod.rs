//! Ports the workflow engine depends on. Adapters live in `crate::adapters`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Status, Transaction, TransactionUpdate};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("transaction {0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Record store for transactions.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_status_in(&self, statuses: &[Status]) -> RepositoryResult<Vec<Transaction>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>>;

    /// Unknown ids are skipped, not reported.
    async fn find_by_id_in(&self, ids: &[String]) -> RepositoryResult<Vec<Transaction>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Transaction>>;

    /// Writes `update` and refreshes `last_updated`. Fails with `NotFound`
    /// when the id does not resolve.
    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<Transaction>;

    /// Writes `update` only while the record still has status `expected`.
    /// Returns `None` when the id does not resolve or the status has moved.
    async fn update_if_status(
        &self,
        id: &str,
        expected: Status,
        update: &TransactionUpdate,
    ) -> RepositoryResult<Option<Transaction>>;

    /// Conditional bulk write. The update is applied only if every distinct id
    /// currently has `status_equals`; otherwise nothing is written. Returns
    /// the number of rows that matched the condition.
    async fn update_many_where(
        &self,
        ids: &[String],
        status_equals: Status,
        update: &TransactionUpdate,
    ) -> RepositoryResult<u64>;

    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction>;

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[derive(Error, Debug)]
#[error("notification delivery failed: {0}")]
pub struct NotificationError(pub String);

/// Outbound channel used to tell a client that transactions need review.
#[async_trait]
pub trait ClientNotifier: Send + Sync {
    async fn notify(&self, transaction_ids: &[String], content: &str) -> Result<(), NotificationError>;
}
