//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, DisplayName, Participant, RepositoryError, Room, RoomId};

/// 参加処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// この参加によってルームが作成されたか
    pub room_created: bool,
    /// 同じ表示名で置き換えられた参加者
    pub replaced: Option<Participant>,
    /// 参加直後の参加者一覧（表示名順）
    pub participants: Vec<Participant>,
}

/// 退出処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub departed: Participant,
    /// ルームが空になりレジストリから削除されたか
    pub room_removed: bool,
    /// 退出後に残った参加者一覧（表示名順）
    pub remaining: Vec<Participant>,
}

/// Room Registry trait
///
/// ルーム ID から Room へのプロセス全体のマッピング。Room のライフタイムを
/// 唯一管理します。
///
/// ## 不変条件
///
/// - ルームがレジストリに存在する ⇔ 参加者が 1 人以上いる
/// - 同じルーム ID への同時の初回参加でルームが二重に作成されない
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 参加者をルームに追加する（ルームが無ければ作成する）
    ///
    /// ルームの取得・作成と参加者の追加は 1 つのクリティカルセクション内で行われ、
    /// 空のルームが外部から観測されることはありません。
    async fn join(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// 参加者をルームから削除する
    ///
    /// 表示名が `connection_id` の接続に保持されている場合のみ削除します。
    /// ルームが空になった場合は同じクリティカルセクション内でルームを削除します。
    /// 削除対象がなければ `None` を返します。
    async fn leave(
        &self,
        room_id: &RoomId,
        name: &DisplayName,
        connection_id: &ConnectionId,
    ) -> Option<LeaveOutcome>;

    /// ルームが空の場合のみレジストリから削除する
    async fn remove_if_empty(&self, room_id: &RoomId) -> bool;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ルームのスナップショットを取得（ルーム ID 順）
    async fn get_rooms(&self) -> Vec<Room>;

    async fn contains_room(&self, room_id: &RoomId) -> bool;

    async fn count_rooms(&self) -> usize;

    /// ルームの参加者一覧を取得（表示名順、ルームが無ければ空）
    async fn get_participants(&self, room_id: &RoomId) -> Vec<Participant>;

    /// チャット送信者のファンアウト対象を取得
    ///
    /// 送信者がこの接続で表示名を保持していない場合はエラーになります。
    /// 送信者自身も対象に含まれます。
    async fn get_broadcast_targets(
        &self,
        room_id: &RoomId,
        sender_name: &DisplayName,
        sender_connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, RepositoryError>;

    /// ルームのファンアウト対象を取得（`exclude` は除外）
    async fn get_room_targets(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId>;
}
