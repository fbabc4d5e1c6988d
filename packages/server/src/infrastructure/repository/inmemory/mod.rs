//! In-memory repository implementations.

pub mod room;

pub use room::InMemoryRoomRepository;
