//! Domain layer: value objects, entities, the session state machine and the
//! interfaces the rest of the server depends on.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{DEFAULT_PARTICIPANT_CAPACITY, Participant, Room};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use message_pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use repository::{JoinOutcome, LeaveOutcome, RoomRepository};
pub use session::{Membership, Session, SessionState};
pub use value_object::{AvatarUrl, ConnectionId, DisplayName, MessageContent, RoomId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
