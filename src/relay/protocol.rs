//! Wire format spoken with the coordinator.
//!
//! Every message is a single JSON object terminated by `\n`. The client sends a request and waits
//! for exactly one response before sending anything else.
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::relay::change::ChangeRecord;
use crate::relay::error::ProtocolError;

#[derive(Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum CoordinatorRequest<'a> {
    Login {
        username: &'a str,
        password: &'a str,
    },
    AddChange {
        change: &'a ChangeRecord,
    },
}

#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CoordinatorResponse {
    Ok,
    Error { message: String },
}

/// Newline-delimited JSON transport over any bidirectional byte stream.
pub struct Transport<S> {
    stream: BufReader<S>,
    buffer: String,
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
            buffer: String::new(),
        }
    }

    /// Sends a request and waits for its response.
    pub async fn call(
        &mut self,
        request: &CoordinatorRequest<'_>,
    ) -> Result<CoordinatorResponse, ProtocolError> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');

        let writer = self.stream.get_mut();
        writer.write_all(&line).await?;
        writer.flush().await?;

        self.buffer.clear();
        if self.stream.read_line(&mut self.buffer).await? == 0 {
            return Err(ProtocolError::ConnectionClosed);
        }
        Ok(serde_json::from_str(self.buffer.trim_end())?)
    }

    /// Shuts down the write side so that the coordinator sees the end of the session.
    pub async fn shutdown(mut self) -> Result<(), ProtocolError> {
        self.stream.get_mut().shutdown().await?;
        Ok(())
    }
}
