//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ルームのスナップショットを取得（ルーム ID 順）
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }

    /// 現在のルーム数
    pub async fn count(&self) -> usize {
        self.repository.count_rooms().await
    }
}
