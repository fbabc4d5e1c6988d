//! WebSocket message DTOs (the JSON wire protocol).

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Envelope type tag.
///
/// `join`, `create` and `chat` are sent by clients; `join`, `chat`, `system`
/// and `participantList` are sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Join,
    Create,
    Chat,
    System,
    ParticipantList,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Create => "create",
            Self::Chat => "chat",
            Self::System => "system",
            Self::ParticipantList => "participantList",
        }
    }
}

/// Sender identity attached to an envelope.
///
/// `timestamp` is kept as the JSON number the client sent (integer,
/// fractional or exponent form) and echoed back as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default = "zero_timestamp")]
    pub timestamp: Number,
}

fn zero_timestamp() -> Number {
    Number::from(0)
}

impl Metadata {
    pub fn new(
        name: impl Into<String>,
        avatar_url: impl Into<String>,
        timestamp_millis: i64,
    ) -> Self {
        Self {
            name: name.into(),
            avatar_url: avatar_url.into(),
            timestamp: Number::from(timestamp_millis),
        }
    }

    /// The timestamp as Unix milliseconds, truncating any fraction.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp
            .as_i64()
            .or_else(|| self.timestamp.as_f64().map(|millis| millis as i64))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub message: String,
}

/// Client → server envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEnvelope {
    pub r#type: MessageType,
    pub room_id: String,
    #[serde(alias = "metaData")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ChatPayload>,
}

impl InboundEnvelope {
    pub fn join(room_id: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            r#type: MessageType::Join,
            room_id: room_id.into(),
            metadata,
            payload: None,
        }
    }

    pub fn chat(room_id: impl Into<String>, metadata: Metadata, message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Chat,
            room_id: room_id.into(),
            metadata,
            payload: Some(ChatPayload {
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundPayload {
    Message { message: String },
    Participants { participants: Vec<String> },
}

/// Server → client envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEnvelope {
    pub r#type: MessageType,
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub payload: OutboundPayload,
}

impl OutboundEnvelope {
    /// `"<name> joined the room"` notice carrying the joiner's metadata.
    pub fn join_notice(room_id: impl Into<String>, metadata: Metadata) -> Self {
        let message = format!("{} joined the room", metadata.name);
        Self {
            r#type: MessageType::Join,
            room_id: room_id.into(),
            metadata: Some(metadata),
            payload: OutboundPayload::Message { message },
        }
    }

    pub fn chat(room_id: impl Into<String>, metadata: Metadata, message: String) -> Self {
        Self {
            r#type: MessageType::Chat,
            room_id: room_id.into(),
            metadata: Some(metadata),
            payload: OutboundPayload::Message { message },
        }
    }

    pub fn system(room_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::System,
            room_id: room_id.into(),
            metadata: None,
            payload: OutboundPayload::Message {
                message: message.into(),
            },
        }
    }

    pub fn participant_list(room_id: impl Into<String>, participants: Vec<String>) -> Self {
        Self {
            r#type: MessageType::ParticipantList,
            room_id: room_id.into(),
            metadata: None,
            payload: OutboundPayload::Participants { participants },
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.payload {
            OutboundPayload::Message { message } => Some(message),
            OutboundPayload::Participants { .. } => None,
        }
    }

    pub fn participants(&self) -> Option<&[String]> {
        match &self.payload {
            OutboundPayload::Participants { participants } => Some(participants),
            OutboundPayload::Message { .. } => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
