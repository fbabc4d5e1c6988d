//! VibeLounge chat relay server.
//!
//! Clients join named rooms over WebSocket and every chat is fanned out to the
//! members of the sender's room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin vibelounge-server
//! cargo run --bin vibelounge-server -- --host 0.0.0.0 --port 3000 --room-capacity 20
//! ```

use std::sync::Arc;

use clap::Parser;
use vibelounge_server::{
    config::{DEFAULT_HOST, DEFAULT_OUTBOUND_BUFFER, DEFAULT_PORT, ServerConfig},
    domain::DEFAULT_PARTICIPANT_CAPACITY,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server},
};
use vibelounge_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "vibelounge-server")]
#[command(about = "Group chat relay server with named rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum number of participants per room
    #[arg(long, default_value_t = DEFAULT_PARTICIPANT_CAPACITY)]
    room_capacity: usize,

    /// Outbound buffer size (messages) per connection
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            room_capacity: args.room_capacity,
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "debug");

    let config = match ServerConfig::from(Args::parse()).validate() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Starting with {:?}", config);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. AppState (UseCases)
    // 4. Server

    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new(config.room_capacity));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create UseCases
    let state = Arc::new(AppState::new(
        repository,
        message_pusher,
        config.outbound_buffer,
    ));

    // 4. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
