use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::{InMemoryTransactionRepository, LoggingNotifier, PostgresTransactionRepository};
use crate::config::{Config, LogFormat, StorageBackend};
use crate::db;
use crate::ports::TransactionRepository;
use crate::services::TransactionWorkflow;
use crate::AppState;

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connects the configured storage backend. Postgres is migrated on connect.
pub async fn init_repository(config: &Config) -> Result<Arc<dyn TransactionRepository>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = db::create_pool(config).await?;
            db::run_migrations(&pool, Path::new("./migrations")).await?;
            tracing::info!("Using Postgres transaction store");
            Ok(Arc::new(PostgresTransactionRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory transaction store; data is lost on exit");
            Ok(Arc::new(InMemoryTransactionRepository::new()))
        }
    }
}

pub async fn init_workflow(config: &Config) -> Result<TransactionWorkflow> {
    let repository = init_repository(config).await?;
    Ok(TransactionWorkflow::new(repository, Arc::new(LoggingNotifier)))
}

pub async fn init_state(config: &Config) -> Result<AppState> {
    let workflow = init_workflow(config).await?;
    let mut state = AppState::new(workflow);
    state.graphql_playground = config.graphql_playground;
    state.cors_allowed_origins = config.cors_allowed_origins.clone();
    Ok(state)
}
