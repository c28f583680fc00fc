use crate::github::CommitSha;

/// Failure of the line-based transport underneath the coordinator session.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error while talking to the coordinator")]
    Io(#[from] std::io::Error),
    #[error("Cannot encode or decode a coordinator message")]
    Codec(#[from] serde_json::Error),
    #[error("Coordinator closed the connection before answering")]
    ConnectionClosed,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Invalid coordinator address `{address}`, expected `host:port`")]
    InvalidAddress { address: String },
    #[error("Could not connect to coordinator at {address}")]
    Unreachable {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Coordinator rejected the credentials: {reason}")]
    Rejected { reason: String },
    #[error("Authentication with the coordinator failed")]
    Protocol(#[from] ProtocolError),
}

/// A single `addChange` call failed. Records acknowledged before it stay delivered.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Coordinator refused change {revision} after {delivered} delivered change(s): {message}")]
    Refused {
        revision: CommitSha,
        delivered: usize,
        message: String,
    },
    #[error("Delivery of change {revision} failed after {delivered} delivered change(s)")]
    Protocol {
        revision: CommitSha,
        delivered: usize,
        #[source]
        source: ProtocolError,
    },
}

impl DeliveryError {
    /// Number of changes of the batch that were acknowledged before the failure.
    pub fn delivered(&self) -> usize {
        match self {
            DeliveryError::Refused { delivered, .. } | DeliveryError::Protocol { delivered, .. } => {
                *delivered
            }
        }
    }
}

/// Reason why a batch could not be (fully) relayed.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
