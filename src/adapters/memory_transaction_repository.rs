//! In-process TransactionRepository backed by a locked map.
//! Used by the `memory` storage backend and throughout the test suite.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::domain::{Status, Transaction, TransactionUpdate};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    records: RwLock<HashMap<String, Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let records = transactions
            .into_iter()
            .map(|tx| (tx.id.clone(), tx))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

fn sorted(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    transactions
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find_by_status_in(&self, statuses: &[Status]) -> RepositoryResult<Vec<Transaction>> {
        let records = self.records.read().await;
        Ok(sorted(
            records
                .values()
                .filter(|tx| statuses.contains(&tx.status))
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_id_in(&self, ids: &[String]) -> RepositoryResult<Vec<Transaction>> {
        let records = self.records.read().await;
        let wanted: BTreeSet<&String> = ids.iter().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Transaction>> {
        Ok(sorted(self.records.read().await.values().cloned().collect()))
    }

    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<Transaction> {
        let mut records = self.records.write().await;
        let tx = records
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        tx.apply(update, Utc::now());
        Ok(tx.clone())
    }

    async fn update_if_status(
        &self,
        id: &str,
        expected: Status,
        update: &TransactionUpdate,
    ) -> RepositoryResult<Option<Transaction>> {
        let mut records = self.records.write().await;
        Ok(match records.get_mut(id) {
            Some(tx) if tx.status == expected => {
                tx.apply(update, Utc::now());
                Some(tx.clone())
            }
            _ => None,
        })
    }

    async fn update_many_where(
        &self,
        ids: &[String],
        status_equals: Status,
        update: &TransactionUpdate,
    ) -> RepositoryResult<u64> {
        let mut records = self.records.write().await;
        let distinct: BTreeSet<&String> = ids.iter().collect();

        let matched = distinct
            .iter()
            .filter(|id| {
                records
                    .get(id.as_str())
                    .is_some_and(|tx| tx.status == status_equals)
            })
            .count();

        if matched == distinct.len() {
            let now = Utc::now();
            for id in &distinct {
                if let Some(tx) = records.get_mut(id.as_str()) {
                    tx.apply(update, now);
                }
            }
        }

        Ok(matched as u64)
    }

    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        self.records
            .write()
            .await
            .insert(tx.id.clone(), tx.clone());
        Ok(tx.clone())
    }
}
