use async_graphql::{
    ComplexObject, Context, Error, ErrorExtensions, InputObject, Object, Result, SimpleObject,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{Status, Transaction};
use crate::services::{TransactionWorkflow, WorkflowError};

/// Wire shape of a transaction, shared by the GraphQL and REST surfaces.
/// Timestamps are ISO-8601 strings. `recievedCents` keeps the spelling
/// existing clients query.
#[derive(SimpleObject, Serialize, Debug, Clone)]
#[graphql(name = "Transaction", complex)]
#[serde(rename_all = "camelCase")]
pub struct TransactionObject {
    pub id: String,
    pub last_updated: String,
    pub date: String,
    pub description: String,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub spent_cents: i64,
    #[graphql(name = "recievedCents")]
    #[serde(rename = "recievedCents")]
    pub received_cents: i64,
    pub status: Status,
    pub comments: Vec<String>,
}

#[ComplexObject]
impl TransactionObject {
    #[graphql(name = "receivedCents")]
    async fn received_cents_corrected(&self) -> i64 {
        self.received_cents
    }
}

fn to_wire_time(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Transaction> for TransactionObject {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            last_updated: to_wire_time(tx.last_updated),
            date: to_wire_time(tx.date),
            description: tx.description,
            vendor: tx.vendor,
            category: tx.category,
            spent_cents: tx.spent_cents,
            received_cents: tx.received_cents,
            status: tx.status,
            comments: tx.comments,
        }
    }
}

impl ErrorExtensions for WorkflowError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, e| match self {
            WorkflowError::NotFound(id) => {
                e.set("code", "NOT_FOUND");
                e.set("id", id.as_str());
            }
            WorkflowError::InvalidTransition { from, to } => {
                e.set("code", "INVALID_TRANSITION");
                e.set("from", from.as_str());
                e.set("to", to.as_str());
            }
            WorkflowError::InvalidPrecondition { ids } => {
                e.set("code", "INVALID_PRECONDITION");
                e.set("ids", ids.clone());
            }
            WorkflowError::Notification(_) | WorkflowError::Storage(_) => {
                e.set("code", "STORAGE_FAILURE");
            }
        })
    }
}

fn workflow<'a>(ctx: &Context<'a>) -> Result<&'a TransactionWorkflow> {
    ctx.data::<TransactionWorkflow>()
}

#[derive(InputObject)]
pub struct TransactionsInput {
    pub status: Vec<Status>,
}

#[derive(Default)]
pub struct TransactionQuery;

#[Object]
impl TransactionQuery {
    async fn transactions(&self, ctx: &Context<'_>, input: TransactionsInput) -> Result<Vec<TransactionObject>> {
        let txs = workflow(ctx)?
            .list_transactions(&input.status)
            .await
            .map_err(|e| e.extend())?;
        Ok(txs.into_iter().map(TransactionObject::from).collect())
    }

    async fn get_all_vendors(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        let vendors = workflow(ctx)?
            .list_distinct_vendors()
            .await
            .map_err(|e| e.extend())?;
        Ok(vendors.into_iter().collect())
    }

    async fn get_all_categories(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        let categories = workflow(ctx)?
            .list_distinct_categories()
            .await
            .map_err(|e| e.extend())?;
        Ok(categories.into_iter().collect())
    }
}

#[derive(Default)]
pub struct TransactionMutation;

#[Object]
impl TransactionMutation {
    async fn approve_transaction(
        &self,
        ctx: &Context<'_>,
        id: String,
        vendor: String,
        category: String,
    ) -> Result<TransactionObject> {
        workflow(ctx)?
            .approve(&id, vendor, category)
            .await
            .map(TransactionObject::from)
            .map_err(|e| e.extend())
    }

    async fn exclude_transaction(&self, ctx: &Context<'_>, id: String) -> Result<TransactionObject> {
        workflow(ctx)?
            .exclude(&id)
            .await
            .map(TransactionObject::from)
            .map_err(|e| e.extend())
    }

    async fn send_transaction_to_client(&self, ctx: &Context<'_>, id: String) -> Result<TransactionObject> {
        workflow(ctx)?
            .send_to_client(&id)
            .await
            .map(TransactionObject::from)
            .map_err(|e| e.extend())
    }

    async fn send_transaction_notification(
        &self,
        ctx: &Context<'_>,
        ids: Vec<String>,
        content: String,
    ) -> Result<Vec<String>> {
        workflow(ctx)?
            .notify_client_for_pending(ids, &content)
            .await
            .map_err(|e| e.extend())
    }

    async fn update_vendor(&self, ctx: &Context<'_>, id: String, vendor: String) -> Result<TransactionObject> {
        workflow(ctx)?
            .set_vendor(&id, &vendor)
            .await
            .map(TransactionObject::from)
            .map_err(|e| e.extend())
    }

    async fn update_category(&self, ctx: &Context<'_>, id: String, category: String) -> Result<TransactionObject> {
        workflow(ctx)?
            .set_category(&id, &category)
            .await
            .map(TransactionObject::from)
            .map_err(|e| e.extend())
    }

    /// General transition. Omitted or null labels keep their stored values.
    async fn transition_transaction(
        &self,
        ctx: &Context<'_>,
        id: String,
        status: Status,
        vendor: Option<String>,
        category: Option<String>,
    ) -> Result<TransactionObject> {
        workflow(ctx)?
            .transition_status(&id, status, vendor, category)
            .await
            .map(TransactionObject::from)
            .map_err(|e| e.extend())
    }
}
