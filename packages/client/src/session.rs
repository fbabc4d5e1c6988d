//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};
use vibelounge_server::infrastructure::dto::websocket::{InboundEnvelope, OutboundEnvelope};

use super::{
    error::ClientError, formatter::MessageFormatter, runner::ClientConfig, ui::redisplay_prompt,
};

fn connect_error(url: &str, error: tungstenite::Error) -> ClientError {
    match error {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    }
}

/// Run one WebSocket client session
///
/// Joins the configured room and sends every input line as a chat envelope.
/// Returns `Ok(())` when the user ends input and an error when the connection
/// is lost.
pub async fn run_client_session(
    config: &ClientConfig,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(config.url.as_str())
        .await
        .map_err(|e| connect_error(&config.url, e))?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}' in room '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        config.name, config.room_id
    );

    let (mut write, mut read) = ws_stream.split();

    let join = InboundEnvelope::join(config.room_id.clone(), config.metadata());
    write
        .send(Message::Text(serde_json::to_string(&join)?.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    // Spawn a task to handle incoming messages
    let name_for_read = config.name.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<OutboundEnvelope>(text.as_str()) {
                        Ok(envelope) => MessageFormatter::format_envelope(&envelope, &name_for_read),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // User ended input
                    read_task.abort();
                    let _ = write.close().await;
                    return Ok(());
                };

                let chat = InboundEnvelope::chat(config.room_id.clone(), config.metadata(), line);
                let json = serde_json::to_string(&chat)?;
                if let Err(e) = write.send(Message::Text(json.into())).await {
                    tracing::warn!("Failed to send message: {}", e);
                    read_task.abort();
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}
