use std::fmt::{Debug, Formatter};

use secrecy::{ExposeSecret, SecretString};
use tracing::level_filters::LevelFilter;

/// Username presented to the coordinator by this integration.
pub const DEFAULT_COORDINATOR_USERNAME: &str = "github";
/// Password presented to the coordinator by this integration.
pub const DEFAULT_COORDINATOR_PASSWORD: &str = "webhooks";

/// Verbosity accepted on the command line.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    /// `tracing` has nothing above `ERROR`, so this behaves like [`LogLevel::Error`].
    Fatal,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal => LevelFilter::ERROR,
        }
    }
}

/// Credential pair dedicated to the webhook integration.
/// The password can be read only through [`CoordinatorCredentials::password`].
pub struct CoordinatorCredentials {
    username: String,
    password: SecretString,
}

impl CoordinatorCredentials {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password: SecretString::new(password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret().as_str()
    }
}

impl Default for CoordinatorCredentials {
    fn default() -> Self {
        Self::new(
            DEFAULT_COORDINATOR_USERNAME.to_string(),
            DEFAULT_COORDINATOR_PASSWORD.to_string(),
        )
    }
}

impl Debug for CoordinatorCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
