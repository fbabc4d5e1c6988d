//! UseCase layer: one struct per application operation.
//!
//! Each use case depends only on the domain traits (`RoomRepository`,
//! `MessagePusher`) and receives its dependencies as `Arc<dyn ...>`.

mod connect_client;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod send_message;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetRoomDetailError, JoinRoomError, SendMessageError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use send_message::SendMessageUseCase;
