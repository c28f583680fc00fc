//! Delivery of change records to the CI coordinator.
//!
//! Each batch gets its own connection: connect, authenticate, send every change and wait for its
//! acknowledgment, then close. Nothing is retried and nothing is persisted; a failure abandons
//! the rest of the batch.
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::CoordinatorCredentials;
use crate::utils::logging::LogError;
use crate::utils::text::counted;

pub mod change;
pub mod client;
pub mod error;
mod protocol;

pub use change::{ChangeRecord, NewChange, DEFAULT_CHANGE_SOURCE};
pub use error::{AuthenticationError, ConnectionError, DeliveryError, ProtocolError, RelayError};

/// Sends batches of changes to the coordinator at a fixed address.
#[derive(Debug)]
pub struct RelayClient {
    address: String,
    credentials: CoordinatorCredentials,
}

impl RelayClient {
    pub fn new(address: String, credentials: CoordinatorCredentials) -> Self {
        Self {
            address,
            credentials,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Delivers `changes` in order over a single connection.
    /// Returns the number of changes acknowledged by the coordinator.
    pub async fn deliver(&self, changes: Vec<ChangeRecord>) -> Result<usize, RelayError> {
        tracing::debug!("Connecting to coordinator at {}", self.address);
        let connection = client::connect(&self.address).await?;
        let mut session = connection.authenticate(&self.credentials).await?;
        tracing::debug!("Authenticated as {}", self.credentials.username());

        for change in changes {
            session.add_change(&change).await?;
            tracing::info!("New revision: {}", change.revision().short());
            for (key, value) in change.fields() {
                tracing::debug!("  {key}: {value}");
            }
        }

        let delivered = session.delivered();
        if let Err(error) = session.close().await {
            tracing::warn!("Could not close coordinator connection cleanly: {error:?}");
        }
        Ok(delivered)
    }
}

/// Delivers `changes` on a separate task, so that the caller does not wait for the coordinator.
/// Failures are only logged.
pub fn spawn_delivery(relay: Arc<RelayClient>, changes: Vec<ChangeRecord>) -> JoinHandle<()> {
    let span = tracing::info_span!(
        "Delivery",
        coordinator = relay.address(),
        changes = changes.len()
    );
    tokio::spawn(
        async move {
            match relay.deliver(changes).await {
                Ok(delivered) => tracing::debug!("Delivered {}", counted(delivered, "change")),
                Err(error) => tracing::Span::current().log_error(error.into()),
            }
        }
        .instrument(span),
    )
}
