//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加通知・参加者一覧のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - ルームが初回参加で作成され、同名参加で置き換わることを保証
//! - 参加通知が参加者本人に届かないこと、一覧が本人を含む全員に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - 異常系：ルームの上限超過
//! - エッジケース：同じ表示名での再参加（置き換え）

use std::sync::Arc;

use vibelounge_shared::time::get_utc_timestamp;

use crate::domain::{
    AvatarUrl, BroadcastReport, ConnectionId, DisplayName, JoinOutcome, MessagePushError,
    MessagePusher, Participant, RoomId, RoomRepository, Timestamp,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// ルームが無ければ作成します。同じ表示名の参加者がいれば置き換えます。
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加成功（置き換えた参加者と参加者一覧を含む）
    /// * `Err(JoinRoomError)` - 参加失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
        name: DisplayName,
        avatar_url: AvatarUrl,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let joined_at = Timestamp::new(get_utc_timestamp());
        let participant = Participant::new(connection_id, name, avatar_url, joined_at);

        let outcome = self.repository.join(room_id, participant).await?;
        Ok(outcome)
    }

    /// 参加通知を本人以外の参加者にブロードキャスト
    pub async fn broadcast_participant_joined(
        &self,
        room_id: &RoomId,
        new_connection_id: &ConnectionId,
        message: &str,
    ) -> BroadcastReport {
        let targets = self
            .repository
            .get_room_targets(room_id, Some(new_connection_id))
            .await;
        self.message_pusher.broadcast(targets, message).await
    }

    /// ルームの全参加者（本人を含む）にブロードキャスト
    pub async fn broadcast_to_room(&self, room_id: &RoomId, message: &str) -> BroadcastReport {
        let targets = self.repository.get_room_targets(room_id, None).await;
        self.message_pusher.broadcast(targets, message).await
    }

    /// 特定の接続にだけ送信（ウェルカムメッセージ、エラー通知など）
    pub async fn push_to(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }
}
