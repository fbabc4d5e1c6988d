//! Entity 定義
//!
//! - `Participant`: ルームに参加している 1 つの表示名と、それを保持する接続
//! - `Room`: 参加者の集合。表示名をキーとして参加者を保持する

use std::collections::HashMap;

use super::{
    error::RoomError,
    value_object::{AvatarUrl, ConnectionId, DisplayName, RoomId, Timestamp},
};

/// 1 ルームあたりのデフォルト参加者上限
pub const DEFAULT_PARTICIPANT_CAPACITY: usize = 10;

/// ルームの参加者
///
/// `connection_id` は接続そのものを所有しない参照です。接続のライフタイムは
/// トランスポート層が管理します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub name: DisplayName,
    pub avatar_url: AvatarUrl,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        connection_id: ConnectionId,
        name: DisplayName,
        avatar_url: AvatarUrl,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            name,
            avatar_url,
            joined_at,
        }
    }
}

/// チャットルーム
///
/// 参加者は表示名をキーに保持されます。同じ表示名での参加は既存のエントリを
/// 置き換えます（後勝ち）。
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    participants: HashMap<DisplayName, Participant>,
    participant_capacity: usize,
}

impl Room {
    /// デフォルトの参加者上限で空のルームを作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_PARTICIPANT_CAPACITY)
    }

    /// 参加者上限を指定して空のルームを作成
    pub fn with_capacity(id: RoomId, created_at: Timestamp, participant_capacity: usize) -> Self {
        Self {
            id,
            created_at,
            participants: HashMap::new(),
            participant_capacity,
        }
    }

    /// 参加者を追加する
    ///
    /// 同じ表示名の参加者が既にいる場合は置き換え、置き換えられた参加者を返します。
    /// 新しい表示名で上限に達している場合は `RoomError::RoomFull` を返します。
    pub fn join(&mut self, participant: Participant) -> Result<Option<Participant>, RoomError> {
        if !self.participants.contains_key(&participant.name)
            && self.participants.len() >= self.participant_capacity
        {
            return Err(RoomError::RoomFull {
                room_id: self.id.as_str().to_string(),
                capacity: self.participant_capacity,
            });
        }

        Ok(self
            .participants
            .insert(participant.name.clone(), participant))
    }

    /// 表示名で参加者を削除し、ルームが空になったかどうかを返す
    pub fn leave(&mut self, name: &DisplayName) -> bool {
        self.participants.remove(name);
        self.participants.is_empty()
    }

    /// 表示名が指定の接続によって保持されているか
    pub fn is_held_by(&self, name: &DisplayName, connection_id: &ConnectionId) -> bool {
        self.participants
            .get(name)
            .is_some_and(|p| &p.connection_id == connection_id)
    }

    pub fn participant(&self, name: &DisplayName) -> Option<&Participant> {
        self.participants.get(name)
    }

    /// 参加者のスナップショット（表示名順）
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.name.cmp(&b.name));
        participants
    }

    /// 参加者の表示名一覧（表示名順）
    pub fn participant_names(&self) -> Vec<String> {
        self.participants()
            .into_iter()
            .map(|p| p.name.into_string())
            .collect()
    }

    /// ファンアウト対象の接続一覧
    ///
    /// `exclude` に指定された接続は対象から除外されます。
    pub fn broadcast_targets(&self, exclude: Option<&ConnectionId>) -> Vec<ConnectionId> {
        self.participants
            .values()
            .map(|p| p.connection_id)
            .filter(|id| Some(id) != exclude)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participant_capacity(&self) -> usize {
        self.participant_capacity
    }
}
