//! UseCase: 接続の登録・解除
//!
//! WebSocket 接続を受け付けた直後に接続 ID を採番して MessagePusher に登録し、
//! 切断後のクリーンアップが終わった時点で登録を解除します。
//! 登録中の接続数はヘルスチェックが参照します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続登録のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を登録し、採番した接続 ID を返す
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        connection_id
    }

    /// 接続の登録を解除
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        self.message_pusher.unregister_client(connection_id).await;
    }

    /// 登録中の接続数
    pub async fn count_active_connections(&self) -> usize {
        self.message_pusher.count_clients().await
    }
}
