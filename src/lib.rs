//! This is the library of the webhook relay: it turns GitHub pull request webhooks into change
//! records and delivers them to a CI coordinator.
pub mod config;
pub mod github;
pub mod relay;
pub mod utils;

pub use config::{CoordinatorCredentials, LogLevel};
pub use github::server::{create_app, ServerState};
pub use relay::{ChangeRecord, RelayClient};

#[cfg(test)]
mod tests;
