//! Session with the coordinator, modelled as a sequence of types:
//! [`connect`] yields a [`Connection`], which is turned into a [`Session`] by authenticating.
//! Only a [`Session`] can deliver changes, and [`Session::close`] consumes it.
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::config::CoordinatorCredentials;
use crate::relay::change::ChangeRecord;
use crate::relay::error::{AuthenticationError, ConnectionError, DeliveryError, ProtocolError};
use crate::relay::protocol::{CoordinatorRequest, CoordinatorResponse, Transport};

/// Opens a TCP connection to the coordinator listening on `address` (`host:port`).
pub async fn connect(address: &str) -> Result<Connection<TcpStream>, ConnectionError> {
    let (host, port) = parse_address(address)?;
    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| ConnectionError::Unreachable {
            address: address.to_string(),
            source,
        })?;
    Ok(Connection::new(stream))
}

fn parse_address(address: &str) -> Result<(&str, u16), ConnectionError> {
    let invalid = || ConnectionError::InvalidAddress {
        address: address.to_string(),
    };

    let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    match port.parse::<u16>() {
        Ok(port) if port != 0 => Ok((host, port)),
        _ => Err(invalid()),
    }
}

/// An open, not yet authenticated connection.
pub struct Connection<S> {
    transport: Transport<S>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            transport: Transport::new(stream),
        }
    }

    /// Logs in with the integration credentials.
    /// The connection is dropped if the coordinator does not accept them.
    pub async fn authenticate(
        mut self,
        credentials: &CoordinatorCredentials,
    ) -> Result<Session<S>, AuthenticationError> {
        let request = CoordinatorRequest::Login {
            username: credentials.username(),
            password: credentials.password(),
        };
        match self.transport.call(&request).await? {
            CoordinatorResponse::Ok => Ok(Session {
                transport: self.transport,
                delivered: 0,
            }),
            CoordinatorResponse::Error { message } => {
                Err(AuthenticationError::Rejected { reason: message })
            }
        }
    }
}

/// An authenticated connection that accepts changes.
pub struct Session<S> {
    transport: Transport<S>,
    delivered: usize,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Sends one change and waits until the coordinator acknowledges it.
    pub async fn add_change(&mut self, change: &ChangeRecord) -> Result<(), DeliveryError> {
        let request = CoordinatorRequest::AddChange { change };
        match self.transport.call(&request).await {
            Ok(CoordinatorResponse::Ok) => {
                self.delivered += 1;
                Ok(())
            }
            Ok(CoordinatorResponse::Error { message }) => Err(DeliveryError::Refused {
                revision: change.revision().clone(),
                delivered: self.delivered,
                message,
            }),
            Err(source) => Err(DeliveryError::Protocol {
                revision: change.revision().clone(),
                delivered: self.delivered,
                source,
            }),
        }
    }

    /// Number of changes acknowledged in this session so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub async fn close(self) -> Result<(), ProtocolError> {
        self.transport.shutdown().await
    }
}
