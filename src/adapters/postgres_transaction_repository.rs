//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeSet;

use crate::domain::{Status, Transaction, TransactionUpdate};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const COLUMNS: &str = "id, last_updated, date, description, vendor, category, \
                       spent_cents, received_cents, status, comments";

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn status_names(statuses: &[Status]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

fn into_domain_all(rows: Vec<TransactionRow>) -> RepositoryResult<Vec<Transaction>> {
    rows.into_iter().map(TransactionRow::into_domain).collect()
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn find_by_status_in(&self, statuses: &[Status]) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE status = ANY($1) ORDER BY date DESC, id"
        ))
        .bind(status_names(statuses))
        .fetch_all(&self.pool)
        .await?;

        into_domain_all(rows)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn find_by_id_in(&self, ids: &[String]) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        into_domain_all(rows)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions ORDER BY date DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_domain_all(rows)
    }

    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE transactions SET
                status = COALESCE($2, status),
                vendor = COALESCE($3, vendor),
                category = COALESCE($4, category),
                last_updated = GREATEST(clock_timestamp(), last_updated + interval '1 microsecond')
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.status.map(Status::as_str))
        .bind(update.vendor.as_deref())
        .bind(update.category.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_domain()
    }

    async fn update_if_status(
        &self,
        id: &str,
        expected: Status,
        update: &TransactionUpdate,
    ) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE transactions SET
                status = COALESCE($3, status),
                vendor = COALESCE($4, vendor),
                category = COALESCE($5, category),
                last_updated = GREATEST(clock_timestamp(), last_updated + interval '1 microsecond')
            WHERE id = $1 AND status = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(update.status.map(Status::as_str))
        .bind(update.vendor.as_deref())
        .bind(update.category.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn update_many_where(
        &self,
        ids: &[String],
        status_equals: Status,
        update: &TransactionUpdate,
    ) -> RepositoryResult<u64> {
        let distinct: Vec<String> = ids.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let mut db_tx = self.pool.begin().await?;

        let matched = sqlx::query(
            r#"
            UPDATE transactions SET
                status = COALESCE($3, status),
                vendor = COALESCE($4, vendor),
                category = COALESCE($5, category),
                last_updated = GREATEST(clock_timestamp(), last_updated + interval '1 microsecond')
            WHERE id = ANY($1) AND status = $2
            "#,
        )
        .bind(&distinct)
        .bind(status_equals.as_str())
        .bind(update.status.map(Status::as_str))
        .bind(update.vendor.as_deref())
        .bind(update.category.as_deref())
        .execute(&mut *db_tx)
        .await?
        .rows_affected();

        if matched == distinct.len() as u64 {
            db_tx.commit().await?;
        } else {
            tracing::warn!(
                expected = distinct.len(),
                matched,
                "Conditional bulk update rolled back"
            );
            db_tx.rollback().await?;
        }

        Ok(matched)
    }

    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&tx.id)
        .bind(tx.last_updated)
        .bind(tx.date)
        .bind(&tx.description)
        .bind(&tx.vendor)
        .bind(&tx.category)
        .bind(tx.spent_cents)
        .bind(tx.received_cents)
        .bind(tx.status.as_str())
        .bind(&tx.comments)
        .fetch_one(&self.pool)
        .await?;

        row.into_domain()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    last_updated: DateTime<Utc>,
    date: DateTime<Utc>,
    description: String,
    vendor: Option<String>,
    category: Option<String>,
    spent_cents: i64,
    received_cents: i64,
    status: String,
    comments: Vec<String>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status = self
            .status
            .parse::<Status>()
            .map_err(|e| RepositoryError::Corrupt(format!("{}: {}", self.id, e)))?;

        Ok(Transaction {
            id: self.id,
            last_updated: self.last_updated,
            date: self.date,
            description: self.description,
            vendor: self.vendor,
            category: self.category,
            spent_cents: self.spent_cents,
            received_cents: self.received_cents,
            status,
            comments: self.comments,
        })
    }
}
