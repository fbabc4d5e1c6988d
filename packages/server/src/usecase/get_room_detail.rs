//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム詳細を取得
    ///
    /// 空文字列の ID は存在しないルームとして扱います。
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
