//! MessagePusher trait 定義
//!
//! 接続（Connection Handle）へのメッセージ送信を抽象化します。
//! 送信はすべて非ブロッキングで行われ、遅い受信者が他の送信を止めることはありません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// 1 接続分の送信チャンネル（有界）
pub type PusherChannel = mpsc::Sender<String>;

/// ブロードキャストの結果
///
/// 呼び出し側は契約上この結果を無視してよく、配信失敗が送信者に伝わることはありません。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub skipped: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にメッセージを送信（ベストエフォート）
    ///
    /// 閉じた接続・バッファが一杯の接続は黙ってスキップされます（再送なし）。
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> BroadcastReport;

    /// 登録中の接続数
    async fn count_clients(&self) -> usize;
}
