//! Protocol dispatcher: the per-connection state machine.
//!
//! One dispatcher is created for every accepted WebSocket. It parses inbound
//! envelopes, drives the connection's [`Session`] and turns each event into
//! registry mutations and fan-out through the use cases.
//!
//! ## 状態遷移
//!
//! - `Unjoined` + `join`/`create` → `InRoom`
//! - `InRoom` + `join`/`create` → 旧ルームから退出してから新ルームへ参加
//! - `InRoom` + `chat` → ルームの全参加者（送信者を含む）へ配信
//! - 任意の状態 + close → `Closed`（退出処理は 1 回だけ）

use std::sync::Arc;

use crate::{
    domain::{
        AvatarUrl, BroadcastReport, ConnectionId, DisplayName, LeaveOutcome, Membership,
        MessageContent, Participant, RoomId, Session,
    },
    infrastructure::dto::websocket::{InboundEnvelope, MessageType, Metadata, OutboundEnvelope},
    usecase::{JoinRoomError, SendMessageError},
};

use super::{error::DispatchError, state::AppState};

/// 1 つの受信エンベロープを処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// ルームに参加した
    Joined {
        room_id: RoomId,
        room_created: bool,
        participants: usize,
    },
    /// チャットを配信した
    Chat(BroadcastReport),
}

pub struct ProtocolDispatcher {
    state: Arc<AppState>,
    session: Session,
}

impl ProtocolDispatcher {
    pub fn new(state: Arc<AppState>, connection_id: ConnectionId) -> Self {
        Self {
            state,
            session: Session::new(connection_id),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.session.connection_id()
    }

    /// 受信した 1 フレームを処理する
    ///
    /// エラーはどれもセッションの状態を変えません（`RoomFull` の場合は
    /// ルーム切り替えで旧ルームから退出済みのため `Unjoined` になります）。
    pub async fn dispatch(&mut self, text: &str) -> Result<Dispatched, DispatchError> {
        if self.session.is_closed() {
            return Err(DispatchError::ConnectionClosed);
        }

        let envelope: InboundEnvelope = serde_json::from_str(text)
            .map_err(|e| DispatchError::MalformedEnvelope(e.to_string()))?;

        match envelope.r#type {
            MessageType::Join | MessageType::Create => self.handle_join(envelope).await,
            MessageType::Chat => self.handle_chat(envelope).await,
            MessageType::System | MessageType::ParticipantList => {
                Err(DispatchError::ProtocolViolation(format!(
                    "'{}' is a server-only message type",
                    envelope.r#type.as_str()
                )))
            }
        }
    }

    /// 接続の終了処理
    ///
    /// 何度呼ばれても退出処理は最初の 1 回だけ実行されます。
    pub async fn close(&mut self) -> Option<LeaveOutcome> {
        let membership = self.session.close()?;
        self.leave_room(membership).await
    }

    async fn handle_join(
        &mut self,
        envelope: InboundEnvelope,
    ) -> Result<Dispatched, DispatchError> {
        let room_id = RoomId::new(envelope.room_id.clone())
            .map_err(|e| DispatchError::MalformedEnvelope(e.to_string()))?;
        let name = DisplayName::new(envelope.metadata.name.clone())
            .map_err(|e| DispatchError::MalformedEnvelope(e.to_string()))?;
        let avatar_url = AvatarUrl::new(envelope.metadata.avatar_url.clone());
        let connection_id = self.connection_id();

        // ルーム切り替え: 旧ルームからの退出を先に済ませる
        if let Some(previous) = self.session.leave() {
            tracing::info!(
                "Connection '{}' switches from room '{}' to '{}'",
                connection_id,
                previous.room_id,
                room_id
            );
            self.leave_room(previous).await;
        }

        let outcome = match self
            .state
            .join_room_usecase
            .execute(connection_id, &room_id, name.clone(), avatar_url)
            .await
        {
            Ok(outcome) => outcome,
            Err(JoinRoomError::RoomFull { room_id, capacity }) => {
                let notice = OutboundEnvelope::system(
                    room_id.clone(),
                    format!("Room {} is full ({} participants)", room_id, capacity),
                );
                self.push_to_self(&notice.to_json()?).await;
                return Err(DispatchError::RoomFull { room_id, capacity });
            }
            Err(JoinRoomError::Repository(message)) => {
                return Err(DispatchError::ProtocolViolation(message));
            }
        };

        self.session.enter(room_id.clone(), name.clone());
        tracing::info!(
            "'{}' joined room '{}' (connection '{}', {} participants)",
            name,
            room_id,
            connection_id,
            outcome.participants.len()
        );

        if let Some(replaced) = outcome
            .replaced
            .as_ref()
            .filter(|replaced| replaced.connection_id != connection_id)
        {
            self.notify_evicted(&room_id, replaced).await?;
        }

        // 1. join 通知（本人以外）
        let joiner = sender_metadata(envelope.metadata, &name);
        let join_notice = OutboundEnvelope::join_notice(room_id.as_str(), joiner);
        self.state
            .join_room_usecase
            .broadcast_participant_joined(&room_id, &connection_id, &join_notice.to_json()?)
            .await;

        // 2. 参加者一覧（本人を含む全員）
        let names = outcome
            .participants
            .iter()
            .map(|participant| participant.name.as_str().to_string())
            .collect();
        let participant_list = OutboundEnvelope::participant_list(room_id.as_str(), names);
        self.state
            .join_room_usecase
            .broadcast_to_room(&room_id, &participant_list.to_json()?)
            .await;

        // 3. ウェルカムメッセージ（本人のみ）
        let welcome = OutboundEnvelope::system(
            room_id.as_str(),
            format!("Welcome to {}, {}!", room_id, name),
        );
        self.push_to_self(&welcome.to_json()?).await;

        Ok(Dispatched::Joined {
            room_id,
            room_created: outcome.room_created,
            participants: outcome.participants.len(),
        })
    }

    async fn handle_chat(
        &mut self,
        envelope: InboundEnvelope,
    ) -> Result<Dispatched, DispatchError> {
        let Some(membership) = self.session.membership() else {
            return Err(DispatchError::ProtocolViolation(
                "chat received before joining a room".to_string(),
            ));
        };
        if membership.room_id.as_str() != envelope.room_id {
            return Err(DispatchError::ProtocolViolation(format!(
                "chat for room '{}' but the connection is in room '{}'",
                envelope.room_id, membership.room_id
            )));
        }
        let room_id = membership.room_id.clone();
        let name = membership.name.clone();

        let Some(payload) = envelope.payload else {
            return Err(DispatchError::MalformedEnvelope(
                "chat without payload".to_string(),
            ));
        };
        let content = MessageContent::new(payload.message.clone())
            .map_err(|e| DispatchError::MalformedEnvelope(e.to_string()))?;

        let chat = OutboundEnvelope::chat(
            room_id.as_str(),
            sender_metadata(envelope.metadata, &name),
            payload.message,
        );
        let report = self
            .state
            .send_message_usecase
            .execute(
                &room_id,
                &name,
                &self.session.connection_id(),
                content,
                &chat.to_json()?,
            )
            .await
            .map_err(|e| match e {
                SendMessageError::NotAMember { .. } | SendMessageError::RoomNotFound(_) => {
                    DispatchError::ProtocolViolation(e.to_string())
                }
                SendMessageError::Repository(message) => DispatchError::ProtocolViolation(message),
            })?;

        if report.skipped > 0 {
            tracing::debug!(
                "Chat in room '{}' skipped {} stale connection(s)",
                room_id,
                report.skipped
            );
        }
        Ok(Dispatched::Chat(report))
    }

    /// 退出処理と残りの参加者への通知
    async fn leave_room(&self, membership: Membership) -> Option<LeaveOutcome> {
        let connection_id = self.connection_id();
        let usecase = &self.state.disconnect_participant_usecase;
        let Some(outcome) = usecase
            .execute(&membership.room_id, &membership.name, &connection_id)
            .await
        else {
            tracing::debug!(
                "Connection '{}' no longer holds '{}' in room '{}', nothing to leave",
                connection_id,
                membership.name,
                membership.room_id
            );
            return None;
        };

        tracing::info!("'{}' left room '{}'", membership.name, membership.room_id);
        if outcome.room_removed {
            return Some(outcome);
        }

        let leave_notice = OutboundEnvelope::system(
            membership.room_id.as_str(),
            format!("{} left the room", membership.name),
        );
        let names = outcome
            .remaining
            .iter()
            .map(|participant| participant.name.as_str().to_string())
            .collect();
        let participant_list =
            OutboundEnvelope::participant_list(membership.room_id.as_str(), names);

        for envelope in [leave_notice, participant_list] {
            match envelope.to_json() {
                Ok(json) => {
                    usecase
                        .broadcast_participant_left(&membership.room_id, &json)
                        .await;
                }
                Err(e) => tracing::error!("Failed to encode leave notification: {}", e),
            }
        }

        Some(outcome)
    }

    async fn notify_evicted(
        &self,
        room_id: &RoomId,
        replaced: &Participant,
    ) -> Result<(), DispatchError> {
        tracing::info!(
            "'{}' in room '{}' replaced connection '{}'",
            replaced.name,
            room_id,
            replaced.connection_id
        );
        let notice = OutboundEnvelope::system(
            room_id.as_str(),
            format!(
                "{} joined {} from another connection; this connection has left the room",
                replaced.name, room_id
            ),
        );
        if let Err(e) = self
            .state
            .join_room_usecase
            .push_to(&replaced.connection_id, &notice.to_json()?)
            .await
        {
            tracing::debug!("Failed to notify replaced connection: {}", e);
        }
        Ok(())
    }

    async fn push_to_self(&self, message: &str) {
        let connection_id = self.connection_id();
        if let Err(e) = self
            .state
            .join_room_usecase
            .push_to(&connection_id, message)
            .await
        {
            tracing::warn!("Failed to push to connection '{}': {}", connection_id, e);
        }
    }
}

/// 送信者の表示名はセッションが保持している名前で上書きする
fn sender_metadata(mut metadata: Metadata, name: &DisplayName) -> Metadata {
    metadata.name = name.as_str().to_string();
    metadata
}
