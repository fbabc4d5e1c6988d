//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `HashMap<RoomId, Room>` をインメモリのレジストリとして使用します。
//!
//! すべての変更操作は 1 つの Mutex で直列化されます。参加（取得・作成・追加）と
//! 退出（削除・空なら削除）はそれぞれ 1 回のロック内で完結するため、
//! 空のルームがロックの外から観測されることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use vibelounge_shared::time::{Clock, SystemClock};

use crate::domain::{
    ConnectionId, DisplayName, JoinOutcome, LeaveOutcome, Participant, RepositoryError, Room,
    RoomId, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// 新しく作成されるルームの参加者上限
    participant_capacity: usize,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(participant_capacity: usize) -> Self {
        Self::with_clock(participant_capacity, Arc::new(SystemClock))
    }

    /// 時計を指定して InMemoryRoomRepository を作成
    pub fn with_clock(participant_capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            participant_capacity,
            clock,
        }
    }

    /// ルームを取得、無ければ作成する
    ///
    /// 呼び出し側がロックを保持したまま参加者を追加する前提です。
    fn get_or_create<'a>(
        &self,
        rooms: &'a mut HashMap<RoomId, Room>,
        room_id: &RoomId,
    ) -> (&'a mut Room, bool) {
        let created = !rooms.contains_key(room_id);
        let room = rooms.entry(room_id.clone()).or_insert_with(|| {
            Room::with_capacity(
                room_id.clone(),
                Timestamp::new(self.clock.now_millis()),
                self.participant_capacity,
            )
        });
        (room, created)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let (room, room_created) = self.get_or_create(&mut rooms, room_id);

        match room.join(participant) {
            Ok(replaced) => {
                let participants = room.participants();
                if room_created {
                    tracing::info!("Room '{}' created", room_id);
                }
                Ok(JoinOutcome {
                    room_created,
                    replaced,
                    participants,
                })
            }
            Err(e) => {
                // 作成直後のルームは空のまま残さない
                if room.is_empty() {
                    rooms.remove(room_id);
                }
                Err(e.into())
            }
        }
    }

    async fn leave(
        &self,
        room_id: &RoomId,
        name: &DisplayName,
        connection_id: &ConnectionId,
    ) -> Option<LeaveOutcome> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id)?;

        if !room.is_held_by(name, connection_id) {
            return None;
        }

        let departed = room.participant(name)?.clone();
        let room_removed = room.leave(name);
        let remaining = room.participants();

        if room_removed {
            rooms.remove(room_id);
            tracing::info!("Room '{}' deleted", room_id);
        }

        Some(LeaveOutcome {
            departed,
            room_removed,
            remaining,
        })
    }

    async fn remove_if_empty(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let is_empty = rooms.get(room_id).is_some_and(Room::is_empty);
        if is_empty {
            rooms.remove(room_id);
        }
        is_empty
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut snapshot: Vec<Room> = rooms.values().cloned().collect();
        snapshot.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot
    }

    async fn contains_room(&self, room_id: &RoomId) -> bool {
        let rooms = self.rooms.lock().await;
        rooms.contains_key(room_id)
    }

    async fn count_rooms(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }

    async fn get_participants(&self, room_id: &RoomId) -> Vec<Participant> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(Room::participants)
            .unwrap_or_default()
    }

    async fn get_broadcast_targets(
        &self,
        room_id: &RoomId,
        sender_name: &DisplayName,
        sender_connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let room = rooms
            .get(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;

        if !room.is_held_by(sender_name, sender_connection_id) {
            return Err(RepositoryError::NotAMember {
                room_id: room_id.as_str().to_string(),
                name: sender_name.as_str().to_string(),
            });
        }

        Ok(room.broadcast_targets(None))
    }

    async fn get_room_targets(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|room| room.broadcast_targets(exclude))
            .unwrap_or_default()
    }
}
