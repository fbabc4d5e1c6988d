//! Errors surfaced by the protocol dispatcher.

use thiserror::Error;

/// 1 つの受信エンベロープの処理結果としてのエラー
///
/// どのエラーも接続を閉じる理由にはならず、受信ループはログを出して次のフレームを待ちます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// JSON として読めない、必須フィールドが無い、名前が空
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// 参加前のチャット、roomId の不一致、置き換え済みの送信者、サーバー専用の type
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("room '{room_id}' is full (capacity: {capacity})")]
    RoomFull { room_id: String, capacity: usize },

    #[error("connection is closed")]
    ConnectionClosed,

    #[error("failed to encode outbound envelope: {0}")]
    EncodeFailed(String),
}

impl From<serde_json::Error> for DispatchError {
    fn from(error: serde_json::Error) -> Self {
        Self::EncodeFailed(error.to_string())
    }
}
