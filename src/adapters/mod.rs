//! Concrete implementations of the ports in `crate::ports`.

pub mod logging_notifier;
pub mod memory_transaction_repository;
pub mod postgres_transaction_repository;

pub use logging_notifier::LoggingNotifier;
pub use memory_transaction_repository::InMemoryTransactionRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;
