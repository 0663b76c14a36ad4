pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod startup;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::graphql::AppSchema;
use crate::services::TransactionWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub workflow: TransactionWorkflow,
    pub schema: AppSchema,
    pub start_time: Instant,
    pub graphql_playground: bool,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl AppState {
    pub fn new(workflow: TransactionWorkflow) -> Self {
        Self {
            schema: graphql::build_schema(workflow.clone()),
            workflow,
            start_time: Instant::now(),
            graphql_playground: true,
            cors_allowed_origins: None,
        }
    }
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(state.cors_allowed_origins.as_deref());

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/graphql",
            get(handlers::graphql::graphql_playground).post(handlers::graphql::graphql_handler),
        )
        .route("/transactions", get(handlers::transactions::list_transactions))
        .route("/transactions/:id", get(handlers::transactions::get_transaction))
        .layer(axum::middleware::from_fn(middleware::request_logger_middleware))
        .layer(cors)
        .with_state(state)
}
