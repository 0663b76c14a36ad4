use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};

use crate::error::AppError;
use crate::AppState;

pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

pub async fn graphql_playground(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    if !state.graphql_playground {
        return Err(AppError::NotFound("GraphQL playground is disabled".to_string()));
    }
    Ok(Html(playground_source(GraphQLPlaygroundConfig::new("/graphql"))))
}
