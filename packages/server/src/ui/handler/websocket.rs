//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::ui::{dispatcher::ProtocolDispatcher, error::DispatchError, state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: envelopes fanned out to this
/// connection (via rx channel) are written to its WebSocket.
///
/// # Arguments
///
/// * `rx` - Bounded channel receiver registered with the MessagePusher
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Register the connection's outbound channel
    let (tx, rx) = mpsc::channel(state.outbound_buffer);
    let connection_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Connection '{}' accepted", connection_id);

    let mut send_task = pusher_loop(rx, sender);
    let mut dispatcher = ProtocolDispatcher::new(state.clone(), connection_id);

    // One envelope at a time until either side finishes
    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut send_task => {
                tracing::debug!("Writer for connection '{}' stopped", connection_id);
                break;
            }
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on connection '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received text from '{}': {}", connection_id, text.as_str());
                if let Err(e) = dispatcher.dispatch(text.as_str()).await {
                    log_dispatch_error(&connection_id.to_string(), &e);
                }
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            _ => {}
        }
    }

    // Close path runs exactly once, after the loop
    dispatcher.close().await;
    state.connect_client_usecase.disconnect(&connection_id).await;
    send_task.abort();
    tracing::info!("Connection '{}' closed", connection_id);
}

fn log_dispatch_error(connection_id: &str, error: &DispatchError) {
    match error {
        DispatchError::MalformedEnvelope(_) | DispatchError::ProtocolViolation(_) => {
            tracing::warn!("Dropped envelope from '{}': {}", connection_id, error);
        }
        DispatchError::RoomFull { .. } => {
            tracing::info!("Rejected join from '{}': {}", connection_id, error);
        }
        DispatchError::ConnectionClosed => {
            tracing::debug!("Envelope from '{}' after close: {}", connection_id, error);
        }
        DispatchError::EncodeFailed(_) => {
            tracing::error!("Failed to answer '{}': {}", connection_id, error);
        }
    }
}
