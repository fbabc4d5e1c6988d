//! UseCase: 参加者の退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 退出通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 最後の参加者の退出でルームが削除されることを保証
//! - 置き換えられた接続の退出が置き換え後の参加者を削除しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と残りの参加者への通知
//! - エッジケース：最後の参加者の退出（通知対象なし）
//! - 異常系：表示名を保持していない接続からの退出

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, ConnectionId, DisplayName, LeaveOutcome, MessagePusher, RoomId,
    RoomRepository,
};

/// 参加者退出のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者の退出を実行
    ///
    /// 表示名がこの接続に保持されている場合のみ削除します。
    /// ルームが空になった場合はレジストリから削除されます。
    ///
    /// # Returns
    ///
    /// * `Some(LeaveOutcome)` - 退出した参加者と残りの参加者
    /// * `None` - 削除対象がなかった（置き換え済み・ルームが存在しない）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        name: &DisplayName,
        connection_id: &ConnectionId,
    ) -> Option<LeaveOutcome> {
        self.repository.leave(room_id, name, connection_id).await
    }

    /// ルームに残っている全参加者にブロードキャスト
    pub async fn broadcast_participant_left(
        &self,
        room_id: &RoomId,
        message: &str,
    ) -> BroadcastReport {
        let targets = self.repository.get_room_targets(room_id, None).await;
        self.message_pusher.broadcast(targets, message).await
    }
}
