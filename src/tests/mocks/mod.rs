pub mod coordinator;
pub mod webhook;
