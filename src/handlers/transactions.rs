use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::domain::Status;
use crate::error::AppError;
use crate::graphql::resolvers::TransactionObject;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Comma-separated status names.
    pub status: Option<String>,
}

fn parse_statuses(raw: Option<&str>) -> Result<Vec<Status>, AppError> {
    match raw {
        None => Ok(Status::ALL.to_vec()),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Status>().map_err(|e| AppError::BadRequest(e.to_string())))
            .collect(),
    }
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TransactionObject>>, AppError> {
    let statuses = parse_statuses(params.status.as_deref())?;
    let transactions = state.workflow.list_transactions(&statuses).await?;
    Ok(Json(transactions.into_iter().map(TransactionObject::from).collect()))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionObject>, AppError> {
    let tx = state
        .workflow
        .repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

    Ok(Json(TransactionObject::from(tx)))
}
