//! Infrastructure layer: concrete registry, connection pusher and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
