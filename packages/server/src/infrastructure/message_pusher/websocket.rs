//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket 接続ごとの送信チャンネル（`PusherChannel`）を管理
//! - 接続へのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成されたチャンネルの送信側を受け取り、メッセージ送信に使用します。
//! チャンネルの受信側は接続ごとの送信タスクが WebSocket に書き出します。
//!
//! 送信は `try_send` のみで行い、決して待機しません。閉じた接続・バッファが
//! 一杯の接続はスキップされます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{BroadcastReport, ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.push_to(&connection_id, "{\"type\":\"system\",...}").await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

fn try_push(
    connection_id: &ConnectionId,
    sender: &PusherChannel,
    content: &str,
) -> Result<(), MessagePushError> {
    if sender.is_closed() {
        return Err(MessagePushError::ChannelClosed(connection_id.to_string()));
    }

    sender
        .try_send(content.to_string())
        .map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::ChannelFull(connection_id.to_string()),
            TrySendError::Closed(_) => MessagePushError::ChannelClosed(connection_id.to_string()),
        })
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        try_push(connection_id, sender, content)?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> BroadcastReport {
        let clients = self.clients.lock().await;
        let mut report = BroadcastReport::default();

        for target in targets {
            let Some(sender) = clients.get(&target) else {
                tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
                report.skipped += 1;
                continue;
            };

            // ブロードキャストでは一部の送信失敗を許容
            match try_push(&target, sender, content) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Skipped delivery during broadcast: {}", e);
                    report.skipped += 1;
                }
            }
        }

        report
    }

    async fn count_clients(&self) -> usize {
        let clients = self.clients.lock().await;
        clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続へのベストエフォート送信
    // - 閉じた接続・バッファが一杯の接続のスキップ
    //
    // 【なぜこのテストが必要か】
    // - 遅い受信者・切断済みの受信者が他の受信者への配信を止めないことを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功・失敗
    // 2. broadcast の成功
    // 3. broadcast の部分失敗（未登録・切断済み・バッファ満杯）
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::channel(8);
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection_id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let connection_id = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(&connection_id, "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound(connection_id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_connection() {
        // テスト項目: 受信側が閉じた接続への送信は ChannelClosed を返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, rx) = mpsc::channel(8);
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&connection_id, "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ChannelClosed(connection_id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数の接続にメッセージをブロードキャストできる
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();

        {
            let mut clients_lock = clients.lock().await;
            clients_lock.insert(alice, tx1);
            clients_lock.insert(bob, tx2);
        }

        // when (操作):
        let report = pusher
            .broadcast(vec![alice, bob], "Broadcast message")
            .await;

        // then (期待する結果):
        assert_eq!(
            report,
            BroadcastReport {
                delivered: 2,
                skipped: 0,
            }
        );
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_stale_and_unknown_connections() {
        // テスト項目: 切断済み・未登録の接続はスキップされ、他の接続には届く
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx_alive, mut rx_alive) = mpsc::channel(8);
        let (tx_stale, rx_stale) = mpsc::channel(8);
        let alive = ConnectionId::generate();
        let stale = ConnectionId::generate();
        let unknown = ConnectionId::generate();
        pusher.register_client(alive, tx_alive).await;
        pusher.register_client(stale, tx_stale).await;
        drop(rx_stale);

        // when (操作):
        let report = pusher
            .broadcast(vec![stale, unknown, alive], "Broadcast message")
            .await;

        // then (期待する結果):
        assert_eq!(
            report,
            BroadcastReport {
                delivered: 1,
                skipped: 2,
            }
        );
        assert_eq!(
            rx_alive.recv().await,
            Some("Broadcast message".to_string())
        );
    }

    #[tokio::test]
    async fn test_broadcast_does_not_wait_for_full_buffer() {
        // テスト項目: バッファが一杯の接続は待たずにスキップされる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx_slow, mut rx_slow) = mpsc::channel(1);
        let (tx_fast, mut rx_fast) = mpsc::channel(8);
        let slow = ConnectionId::generate();
        let fast = ConnectionId::generate();
        pusher.register_client(slow, tx_slow).await;
        pusher.register_client(fast, tx_fast).await;
        pusher.push_to(&slow, "first").await.unwrap();

        // when (操作):
        let report = pusher.broadcast(vec![slow, fast], "second").await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(rx_fast.recv().await, Some("second".to_string()));
        assert_eq!(rx_slow.recv().await, Some("first".to_string()));
        assert!(rx_slow.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_register_and_unregister_update_count() {
        // テスト項目: 登録・解除に応じて接続数が変化する
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, _rx) = mpsc::channel(8);
        let connection_id = ConnectionId::generate();

        // when (操作):
        pusher.register_client(connection_id, tx).await;
        let registered = pusher.count_clients().await;
        pusher.unregister_client(&connection_id).await;
        let unregistered = pusher.count_clients().await;

        // then (期待する結果):
        assert_eq!(registered, 1);
        assert_eq!(unregistered, 0);
    }
}
