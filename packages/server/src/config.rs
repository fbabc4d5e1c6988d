//! Server configuration.
//!
//! The binary parses command line arguments with clap and folds them into a
//! [`ServerConfig`], which is validated before anything is bound.

use thiserror::Error;

use crate::domain::DEFAULT_PARTICIPANT_CAPACITY;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
/// 接続ごとの送信バッファ（メッセージ数）
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("room capacity must be at least 1")]
    ZeroRoomCapacity,

    #[error("outbound buffer must be at least 1")]
    ZeroOutboundBuffer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 1 ルームあたりの参加者の上限
    pub room_capacity: usize,
    /// 接続ごとの送信チャンネルの容量
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            room_capacity: DEFAULT_PARTICIPANT_CAPACITY,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl ServerConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.room_capacity == 0 {
            return Err(ConfigError::ZeroRoomCapacity);
        }
        // mpsc::channel panics on a zero capacity
        if self.outbound_buffer == 0 {
            return Err(ConfigError::ZeroOutboundBuffer);
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
