//! UseCase error types.

use thiserror::Error;

use crate::domain::RepositoryError;

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room '{room_id}' is full (capacity: {capacity})")]
    RoomFull { room_id: String, capacity: usize },

    #[error("repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for JoinRoomError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomFull { room_id, capacity } => Self::RoomFull { room_id, capacity },
            other => Self::Repository(other.to_string()),
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("'{name}' is not a member of room '{room_id}' on this connection")]
    NotAMember { room_id: String, name: String },

    #[error("repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for SendMessageError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(room_id) => Self::RoomNotFound(room_id),
            RepositoryError::NotAMember { room_id, name } => Self::NotAMember { room_id, name },
            other => Self::Repository(other.to_string()),
        }
    }
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
