//! Utilities shared by the VibeLounge server and client.

pub mod logger;
pub mod time;
