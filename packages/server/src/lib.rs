//! VibeLounge chat relay server.
//!
//! Clients connect over WebSocket, join a named room and exchange short text
//! messages that are fanned out to everyone currently in that room.

// layers
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
