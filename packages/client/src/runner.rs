//! Client execution logic with reconnection support.

use std::time::Duration;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use vibelounge_server::infrastructure::dto::websocket::Metadata;
use vibelounge_shared::time::get_utc_timestamp;

use super::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Connection settings for one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub url: String,
    pub room_id: String,
    pub name: String,
    pub avatar_url: String,
}

impl ClientConfig {
    pub fn new(
        url: String,
        room_id: String,
        name: String,
        avatar_url: String,
    ) -> Result<Self, ClientError> {
        if room_id.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "room must not be empty".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            url,
            room_id,
            name,
            avatar_url,
        })
    }

    /// Sender metadata stamped with the current time
    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.name.as_str(), self.avatar_url.as_str(), get_utc_timestamp())
    }
}

/// Spawn a blocking thread for rustyline (synchronous readline)
///
/// The returned channel closes when the user presses Ctrl+C or Ctrl+D.
fn spawn_readline(name: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Run the client with reconnection logic
///
/// Reconnects up to 5 times with a 5 second interval after a lost connection,
/// rejoining the same room each time.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let mut input_rx = spawn_readline(config.name.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' in room '{}' (attempt {}/{})",
            config.url,
            config.name,
            config.room_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(e) if should_exit_immediately(&e) => return Err(e),
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_rejects_blank_values() {
        // テスト項目: ルーム名・表示名が空の設定は拒否される
        // given (前提条件):
        let url = "ws://127.0.0.1:8080/ws".to_string();

        // when (操作):
        let blank_room =
            ClientConfig::new(url.clone(), " ".to_string(), "alice".to_string(), String::new());
        let blank_name =
            ClientConfig::new(url.clone(), "r1".to_string(), "".to_string(), String::new());
        let valid = ClientConfig::new(url, "r1".to_string(), "alice".to_string(), String::new());

        // then (期待する結果):
        assert!(matches!(blank_room, Err(ClientError::InvalidArgument(_))));
        assert!(matches!(blank_name, Err(ClientError::InvalidArgument(_))));
        assert!(valid.is_ok());
    }

    #[test]
    fn test_client_config_metadata() {
        // テスト項目: metadata には表示名とアバター URL、現在時刻が入る
        // given (前提条件):
        let config = ClientConfig::new(
            "ws://127.0.0.1:8080/ws".to_string(),
            "r1".to_string(),
            "alice".to_string(),
            "/a.png".to_string(),
        )
        .unwrap();

        // when (操作):
        let metadata = config.metadata();

        // then (期待する結果):
        assert_eq!(metadata.name, "alice");
        assert_eq!(metadata.avatar_url, "/a.png");
        assert!(metadata.timestamp_millis() > 0);
    }
}
