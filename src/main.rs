use bridger_core::cli::{self, Cli, Commands, DbCommands, TxCommands};
use bridger_core::config::Config;
use bridger_core::{create_app, startup};
use clap::Parser;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::from_env()?;

    startup::init_tracing(config.log_format);

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Tx(command) => {
            let workflow = startup::init_workflow(&config).await?;
            match command {
                TxCommands::List { statuses } => cli::handle_tx_list(&workflow, statuses).await,
                TxCommands::Transition {
                    tx_id,
                    status,
                    vendor,
                    category,
                } => cli::handle_tx_transition(&workflow, &tx_id, status, vendor, category).await,
                TxCommands::Notify { content, tx_ids } => {
                    cli::handle_tx_notify(&workflow, tx_ids, &content).await
                }
            }
        }
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = startup::init_state(&config).await?;
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
