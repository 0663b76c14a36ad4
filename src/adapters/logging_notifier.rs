use async_trait::async_trait;

use crate::ports::{ClientNotifier, NotificationError};

/// Records the client notification in the service log. Delivery to an
/// external channel is not wired up.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl ClientNotifier for LoggingNotifier {
    async fn notify(&self, transaction_ids: &[String], content: &str) -> Result<(), NotificationError> {
        tracing::info!(
            transaction_count = transaction_ids.len(),
            transaction_ids = ?transaction_ids,
            content_len = content.len(),
            "Client notification dispatched"
        );
        Ok(())
    }
}
