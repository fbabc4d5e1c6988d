//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者の所属チェックとブロードキャスト対象の選定
//!
//! ### なぜこのテストが必要か
//! - チャットが送信者自身を含むルームの全参加者に届くことを保証
//! - 置き換えられた接続・未参加のルームからのチャットが配信されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルームの全参加者へのブロードキャスト
//! - 異常系：存在しないルーム、表示名を保持していない接続からの送信
//! - エッジケース：送信者のみが参加している場合

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, ConnectionId, DisplayName, MessageContent, MessagePusher, RoomId,
    RoomRepository,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先のルーム
    /// * `sender_name` - 送信者の表示名
    /// * `sender_connection_id` - 送信者の接続 ID
    /// * `content` - メッセージ内容（Domain Model）
    /// * `json_message` - 送信する JSON メッセージ（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 配信結果（配信失敗は送信者に伝えない）
    /// * `Err(SendMessageError)` - 送信者がルームの参加者ではない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender_name: &DisplayName,
        sender_connection_id: &ConnectionId,
        content: MessageContent,
        json_message: &str,
    ) -> Result<BroadcastReport, SendMessageError> {
        // 1. 所属チェックとブロードキャスト対象の取得（送信者を含む）
        let targets = self
            .repository
            .get_broadcast_targets(room_id, sender_name, sender_connection_id)
            .await?;

        tracing::debug!(
            "'{}' sent {} bytes to room '{}' ({} targets)",
            sender_name,
            content.as_str().len(),
            room_id,
            targets.len()
        );

        // 2. MessagePusher を使ってブロードキャスト
        let report = self.message_pusher.broadcast(targets, json_message).await;
        Ok(report)
    }
}
