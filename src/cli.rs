use clap::{Parser, Subcommand};
use std::path::Path;

use crate::config::{mask_password, Config};
use crate::domain::Status;
use crate::services::TransactionWorkflow;

#[derive(Parser)]
#[command(name = "bridger-core")]
#[command(about = "Bridger Core - bookkeeping transaction review service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction workflow commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// List transactions in the given statuses
    List {
        /// Status to include; repeat for several. Defaults to every status.
        #[arg(short, long = "status", value_name = "STATUS")]
        statuses: Vec<Status>,
    },

    /// Move a transaction to a new status
    Transition {
        #[arg(value_name = "TX_ID")]
        tx_id: String,

        #[arg(value_name = "STATUS")]
        status: Status,

        #[arg(long)]
        vendor: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Notify the client about pending transactions and mark them sent
    Notify {
        /// Message sent to the client
        #[arg(short, long)]
        content: String,

        #[arg(value_name = "TX_ID", required = true)]
        tx_ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_list(workflow: &TransactionWorkflow, statuses: Vec<Status>) -> anyhow::Result<()> {
    let statuses = if statuses.is_empty() {
        Status::ALL.to_vec()
    } else {
        statuses
    };

    let transactions = workflow.list_transactions(&statuses).await?;
    for tx in &transactions {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            tx.id,
            tx.status,
            tx.date.format("%Y-%m-%d"),
            tx.vendor.as_deref().unwrap_or("-"),
            tx.description
        );
    }
    tracing::info!(count = transactions.len(), "Listed transactions");
    Ok(())
}

pub async fn handle_tx_transition(
    workflow: &TransactionWorkflow,
    tx_id: &str,
    status: Status,
    vendor: Option<String>,
    category: Option<String>,
) -> anyhow::Result<()> {
    let tx = workflow
        .transition_status(tx_id, status, vendor, category)
        .await?;
    println!("✓ Transaction {} is now {}", tx.id, tx.status);
    Ok(())
}

pub async fn handle_tx_notify(
    workflow: &TransactionWorkflow,
    tx_ids: Vec<String>,
    content: &str,
) -> anyhow::Result<()> {
    let sent = workflow.notify_client_for_pending(tx_ids, content).await?;
    println!("✓ {} transaction(s) sent to client", sent.len());
    Ok(())
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool, Path::new("./migrations")).await?;

    println!("✓ Database migrations completed");
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");
    config.validate()?;

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Storage Backend: {:?}", config.storage_backend);
    println!(
        "  Database URL: {}",
        config
            .database_url
            .as_deref()
            .map(mask_password)
            .unwrap_or_else(|| "<unset>".to_string())
    );
    println!("  DB Max Connections: {}", config.db_max_connections);
    println!("  Log Format: {:?}", config.log_format);
    println!("  GraphQL Playground: {}", config.graphql_playground);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transition_command() {
        let cli = Cli::try_parse_from([
            "bridger-core",
            "tx",
            "transition",
            "t1",
            "Approved",
            "--vendor",
            "Acme",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Tx(TxCommands::Transition {
                tx_id,
                status,
                vendor,
                category,
            })) => {
                assert_eq!(tx_id, "t1");
                assert_eq!(status, Status::Approved);
                assert_eq!(vendor.as_deref(), Some("Acme"));
                assert_eq!(category, None);
            }
            _ => panic!("expected tx transition"),
        }
    }

    #[test]
    fn test_parse_list_with_repeated_status() {
        let cli = Cli::try_parse_from([
            "bridger-core",
            "tx",
            "list",
            "-s",
            "AutoCategorized",
            "--status",
            "NeedsHumanReview",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Tx(TxCommands::List { statuses })) => {
                assert_eq!(statuses, vec![Status::AutoCategorized, Status::NeedsHumanReview]);
            }
            _ => panic!("expected tx list"),
        }
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["bridger-core", "tx", "transition", "t1", "Done"]).is_err());
    }

    #[test]
    fn test_notify_requires_ids() {
        assert!(Cli::try_parse_from(["bridger-core", "tx", "notify", "--content", "hi"]).is_err());
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["bridger-core"]).unwrap();
        assert!(cli.command.is_none());
    }
}
