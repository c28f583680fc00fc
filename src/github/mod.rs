//! Receiving side of the relay: the webhook HTTP surface and the GitHub payload types it parses.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod server;
mod webhook;

pub use webhook::{GitHubWebhook, MalformedPayloadError};

/// Number of characters shown when a revision is logged.
const SHORT_SHA_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitSha(pub String);

impl CommitSha {
    /// Abbreviated form of the hash, used in log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_SHA_LEN) {
            Some((index, _)) => &self.0[..index],
            None => &self.0,
        }
    }
}

impl From<String> for CommitSha {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl AsRef<str> for CommitSha {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
impl Display for CommitSha {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
