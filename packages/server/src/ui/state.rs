//! Shared application state.

use std::sync::Arc;

use crate::{
    config::DEFAULT_OUTBOUND_BUFFER,
    domain::{MessagePusher, RoomRepository},
    usecase::{
        ConnectClientUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, SendMessageUseCase,
    },
};

/// Shared application state
///
/// 全ての接続タスクと HTTP ハンドラが同じ Repository / MessagePusher を共有します。
pub struct AppState {
    /// ConnectClientUseCase（接続登録のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectParticipantUseCase（参加者退出のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 接続ごとの送信チャンネルの容量
    pub outbound_buffer: usize,
}

impl AppState {
    /// Repository と MessagePusher から全ユースケースを組み立てる
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        outbound_buffer: usize,
    ) -> Self {
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    /// デフォルトの送信バッファで組み立てる
    pub fn with_default_buffer(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self::new(repository, message_pusher, DEFAULT_OUTBOUND_BUFFER)
    }
}
