//! Domain error types.

use thiserror::Error;

/// Value Object の生成に失敗した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("roomId must not be empty")]
    EmptyRoomId,

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("message must not be empty")]
    EmptyMessageContent,
}

/// Room エンティティの操作に失敗した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room '{room_id}' is full (capacity: {capacity})")]
    RoomFull { room_id: String, capacity: usize },
}

/// Repository の操作に失敗した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("'{name}' is not a member of room '{room_id}' on this connection")]
    NotAMember { room_id: String, name: String },

    #[error("room '{room_id}' is full (capacity: {capacity})")]
    RoomFull { room_id: String, capacity: usize },
}

impl From<RoomError> for RepositoryError {
    fn from(error: RoomError) -> Self {
        match error {
            RoomError::RoomFull { room_id, capacity } => Self::RoomFull { room_id, capacity },
        }
    }
}

/// 接続へのメッセージ送信に失敗した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("connection '{0}' is closed")]
    ChannelClosed(String),

    #[error("outbound buffer of connection '{0}' is full")]
    ChannelFull(String),
}
