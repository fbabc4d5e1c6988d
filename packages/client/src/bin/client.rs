//! Terminal client for the VibeLounge chat relay.
//!
//! Joins a room on connect, sends every input line as a chat message and
//! prints everything the room broadcasts.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin vibelounge-client -- --room lobby --name Alice
//! cargo run --bin vibelounge-client -- -r lobby -n Bob -a https://example.com/bob.png
//! ```

use clap::Parser;
use vibelounge_client::{ClientConfig, run_client};
use vibelounge_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "vibelounge-client")]
#[command(about = "Terminal client for VibeLounge group chat rooms", long_about = None)]
struct Args {
    /// Room to join (created on first join)
    #[arg(short = 'r', long)]
    room: String,

    /// Display name in the room
    #[arg(short = 'n', long)]
    name: String,

    /// Avatar image URL shown to other participants
    #[arg(short = 'a', long, default_value = "")]
    avatar_url: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "info");

    let args = Args::parse();

    let config = match ClientConfig::new(args.url, args.room, args.name, args.avatar_url) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
