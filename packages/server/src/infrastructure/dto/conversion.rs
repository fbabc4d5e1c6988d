//! Conversion logic between DTOs and domain entities.

use vibelounge_shared::time::timestamp_to_rfc3339;

use crate::domain::entity::{Participant, Room};
use crate::infrastructure::dto::http as http_dto;

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Participant> for http_dto::ParticipantDetailDto {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.as_str().to_string(),
            avatar_url: participant.avatar_url.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(participant.joined_at.value()),
        }
    }
}

impl From<&Room> for http_dto::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room.participant_names(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http_dto::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants()
                .iter()
                .map(http_dto::ParticipantDetailDto::from)
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvatarUrl, ConnectionId, DisplayName, RoomId, Timestamp};

    fn create_room() -> Room {
        let mut room = Room::new(
            RoomId::new("r1".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );
        for name in ["Bob", "Alice"] {
            room.join(Participant::new(
                ConnectionId::generate(),
                DisplayName::new(name.to_string()).unwrap(),
                AvatarUrl::new(format!("/{}.png", name)),
                Timestamp::new(1672531260000),
            ))
            .unwrap();
        }
        room
    }

    #[test]
    fn test_room_to_summary_dto() {
        // テスト項目: ルームから一覧用 DTO に変換され、参加者名はソートされる
        // given (前提条件):
        let room = create_room();

        // when (操作):
        let dto = http_dto::RoomSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.id, "r1");
        assert_eq!(dto.participants, vec!["Alice", "Bob"]);
        assert_eq!(dto.created_at, "2023-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_room_to_detail_dto() {
        // テスト項目: ルームから詳細 DTO に変換される
        // given (前提条件):
        let room = create_room();

        // when (操作):
        let dto = http_dto::RoomDetailDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.participants.len(), 2);
        assert_eq!(dto.participants[0].name, "Alice");
        assert_eq!(dto.participants[0].avatar_url, "/Alice.png");
        assert_eq!(dto.participants[0].joined_at, "2023-01-01T00:01:00+00:00");
    }
}
