//! Terminal client for the VibeLounge chat relay.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use formatter::MessageFormatter;
pub use runner::{ClientConfig, run_client};
