//! Message formatting utilities for client display.

use vibelounge_server::infrastructure::dto::websocket::{MessageType, OutboundEnvelope};
use vibelounge_shared::time::timestamp_to_rfc3339;

const RULE: &str = "------------------------------------------------------------";
const DOUBLE_RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any envelope received from the server
    ///
    /// # Arguments
    ///
    /// * `envelope` - The decoded server envelope
    /// * `current_name` - The current user's display name (to mark as "me")
    pub fn format_envelope(envelope: &OutboundEnvelope, current_name: &str) -> String {
        match envelope.r#type {
            MessageType::ParticipantList => Self::format_participant_list(
                &envelope.room_id,
                envelope.participants().unwrap_or_default(),
                current_name,
            ),
            MessageType::Join => {
                let name = envelope
                    .metadata
                    .as_ref()
                    .map(|metadata| metadata.name.as_str())
                    .unwrap_or_default();
                Self::format_participant_joined(name, envelope.message().unwrap_or_default())
            }
            MessageType::Chat => {
                let (from, sent_at) = envelope
                    .metadata
                    .as_ref()
                    .map(|metadata| (metadata.name.as_str(), metadata.timestamp_millis()))
                    .unwrap_or_default();
                Self::format_chat_message(
                    from,
                    envelope.message().unwrap_or_default(),
                    sent_at,
                    from == current_name,
                )
            }
            MessageType::System => {
                Self::format_system_message(envelope.message().unwrap_or_default())
            }
            MessageType::Create => Self::format_raw_message(envelope.message().unwrap_or_default()),
        }
    }

    /// Format the participant list of a room
    pub fn format_participant_list(
        room_id: &str,
        participants: &[String],
        current_name: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", DOUBLE_RULE));
        output.push_str(&format!("Participants in {}:\n", room_id));

        if participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for name in participants {
                let me_suffix = if name == current_name { " (me)" } else { "" };
                output.push_str(&format!("{}{}\n", name, me_suffix));
            }
        }

        output.push_str(&format!("{}\n", DOUBLE_RULE));
        output
    }

    /// Format a participant-joined notification
    pub fn format_participant_joined(name: &str, message: &str) -> String {
        if message.is_empty() {
            format!("\n+ {}\n", name)
        } else {
            format!("\n+ {}\n", message)
        }
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `from` - The display name of the sender
    /// * `content` - The message content
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    /// * `is_me` - Whether the current user sent the message
    pub fn format_chat_message(from: &str, content: &str, sent_at: i64, is_me: bool) -> String {
        let me_suffix = if is_me { " (me)" } else { "" };
        format!(
            "\n\n{}\n@{}{}: {}\nsent at {}\n{}\n",
            RULE,
            from,
            me_suffix,
            content,
            timestamp_to_rfc3339(sent_at),
            RULE
        )
    }

    /// Format a server notice (welcome, leave, room full, ...)
    pub fn format_system_message(message: &str) -> String {
        format!("\n* {}\n", message)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
