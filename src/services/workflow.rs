//! Transaction review workflow.
//!
//! Every status change goes through [`TransactionWorkflow::transition_status`]
//! or the bulk path in [`TransactionWorkflow::notify_client_for_pending`];
//! both are gated by [`Status::successors`].

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{Status, Transaction, TransactionUpdate};
use crate::ports::{ClientNotifier, RepositoryError, TransactionRepository};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Transaction {0} not found")]
    NotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("Transactions not in PendingSendToClient: {}", .ids.join(", "))]
    InvalidPrecondition { ids: Vec<String> },

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for WorkflowError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => WorkflowError::NotFound(id),
            other => WorkflowError::Storage(other.to_string()),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Clone)]
pub struct TransactionWorkflow {
    repository: Arc<dyn TransactionRepository>,
    notifier: Arc<dyn ClientNotifier>,
}

impl TransactionWorkflow {
    pub fn new(repository: Arc<dyn TransactionRepository>, notifier: Arc<dyn ClientNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub fn repository(&self) -> &Arc<dyn TransactionRepository> {
        &self.repository
    }

    pub async fn list_transactions(&self, statuses: &[Status]) -> WorkflowResult<Vec<Transaction>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.repository.find_by_status_in(statuses).await?)
    }

    pub async fn list_distinct_vendors(&self) -> WorkflowResult<BTreeSet<String>> {
        let all = self.repository.find_all().await?;
        Ok(distinct_labels(all.into_iter().map(|tx| tx.vendor)))
    }

    pub async fn list_distinct_categories(&self) -> WorkflowResult<BTreeSet<String>> {
        let all = self.repository.find_all().await?;
        Ok(distinct_labels(all.into_iter().map(|tx| tx.category)))
    }

    pub async fn set_vendor(&self, id: &str, vendor: &str) -> WorkflowResult<Transaction> {
        let updated = self
            .repository
            .update(id, &TransactionUpdate::vendor(vendor))
            .await?;
        tracing::info!(transaction_id = %id, vendor = %vendor, "Vendor updated");
        Ok(updated)
    }

    pub async fn set_category(&self, id: &str, category: &str) -> WorkflowResult<Transaction> {
        let updated = self
            .repository
            .update(id, &TransactionUpdate::category(category))
            .await?;
        tracing::info!(transaction_id = %id, category = %category, "Category updated");
        Ok(updated)
    }

    /// Moves a transaction to `target`, optionally overwriting its labels in
    /// the same write. `None` keeps the stored label.
    pub async fn transition_status(
        &self,
        id: &str,
        target: Status,
        vendor: Option<String>,
        category: Option<String>,
    ) -> WorkflowResult<Transaction> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(id.to_string()))?;

        if !current.status.can_transition_to(target) {
            tracing::warn!(
                transaction_id = %id,
                from = %current.status,
                to = %target,
                "Rejected status transition"
            );
            return Err(WorkflowError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let update = TransactionUpdate::status(target)
            .with_vendor(vendor)
            .with_category(category);
        let Some(updated) = self
            .repository
            .update_if_status(id, current.status, &update)
            .await?
        else {
            // The record moved or vanished between the read and the write.
            let latest = self
                .repository
                .find_by_id(id)
                .await?
                .ok_or_else(|| WorkflowError::NotFound(id.to_string()))?;
            tracing::warn!(
                transaction_id = %id,
                expected = %current.status,
                found = %latest.status,
                to = %target,
                "Status changed concurrently, transition rejected"
            );
            return Err(WorkflowError::InvalidTransition {
                from: latest.status,
                to: target,
            });
        };

        tracing::info!(
            transaction_id = %id,
            from = %current.status,
            to = %updated.status,
            "Transaction status changed"
        );
        Ok(updated)
    }

    pub async fn approve(&self, id: &str, vendor: String, category: String) -> WorkflowResult<Transaction> {
        self.transition_status(id, Status::Approved, Some(vendor), Some(category))
            .await
    }

    pub async fn exclude(&self, id: &str) -> WorkflowResult<Transaction> {
        self.transition_status(id, Status::Excluded, None, None).await
    }

    pub async fn send_to_client(&self, id: &str) -> WorkflowResult<Transaction> {
        self.transition_status(id, Status::PendingSendToClient, None, None)
            .await
    }

    /// Notifies the client about a batch of pending transactions and moves
    /// the whole batch to `SentToClient`. Either every transaction advances
    /// or none does.
    pub async fn notify_client_for_pending(
        &self,
        ids: Vec<String>,
        content: &str,
    ) -> WorkflowResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(ids);
        }

        let loaded = self.repository.find_by_id_in(&ids).await?;
        let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        let found: BTreeSet<&str> = loaded.iter().map(|tx| tx.id.as_str()).collect();
        if let Some(missing) = wanted.difference(&found).next() {
            return Err(WorkflowError::NotFound((*missing).to_string()));
        }

        let not_pending: Vec<String> = loaded
            .iter()
            .filter(|tx| tx.status != Status::PendingSendToClient)
            .map(|tx| tx.id.clone())
            .collect();
        if !not_pending.is_empty() {
            tracing::warn!(ids = ?not_pending, "Client notification rejected");
            return Err(WorkflowError::InvalidPrecondition { ids: not_pending });
        }

        self.notifier
            .notify(&ids, content)
            .await
            .map_err(|e| WorkflowError::Notification(e.to_string()))?;

        let matched = self
            .repository
            .update_many_where(
                &ids,
                Status::PendingSendToClient,
                &TransactionUpdate::status(Status::SentToClient),
            )
            .await?;

        if matched != wanted.len() as u64 {
            // A concurrent change moved something out of PendingSendToClient
            // after the check; the store applied nothing.
            let current = self.repository.find_by_id_in(&ids).await?;
            let changed = current
                .into_iter()
                .filter(|tx| tx.status != Status::PendingSendToClient)
                .map(|tx| tx.id)
                .collect();
            return Err(WorkflowError::InvalidPrecondition { ids: changed });
        }

        tracing::info!(count = wanted.len(), "Transactions sent to client");
        Ok(ids)
    }
}

fn distinct_labels(values: impl Iterator<Item = Option<String>>) -> BTreeSet<String> {
    values.flatten().filter(|value| !value.is_empty()).collect()
}
