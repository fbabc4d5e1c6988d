//! UI layer: the Axum router, the WebSocket connection lifecycle and the
//! per-connection protocol dispatcher.

pub mod dispatcher;
pub mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use dispatcher::{Dispatched, ProtocolDispatcher};
pub use error::DispatchError;
pub use server::Server;
pub use state::AppState;
