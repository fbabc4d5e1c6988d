//! Per-connection session state machine.
//!
//! ```text
//! Unjoined ──join──▶ InRoom(room, name) ──join──▶ InRoom(room', name')
//!     │                     │
//!     └──────close──────────┴──────close──────▶ Closed (terminal)
//! ```
//!
//! The session is owned by the dispatcher of a single connection and is never
//! shared between tasks.

use super::value_object::{ConnectionId, DisplayName, RoomId};

/// Room membership held by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room_id: RoomId,
    pub name: DisplayName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unjoined,
    InRoom(Membership),
    Closed,
}

#[derive(Debug)]
pub struct Session {
    connection_id: ConnectionId,
    state: SessionState,
}

impl Session {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            state: SessionState::Unjoined,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn membership(&self) -> Option<&Membership> {
        match &self.state {
            SessionState::InRoom(membership) => Some(membership),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    /// Record a successful join. Ignored once the session is closed.
    pub fn enter(&mut self, room_id: RoomId, name: DisplayName) {
        if self.is_closed() {
            return;
        }
        self.state = SessionState::InRoom(Membership { room_id, name });
    }

    /// Drop the current membership, returning it if there was one.
    pub fn leave(&mut self) -> Option<Membership> {
        match std::mem::replace(&mut self.state, SessionState::Unjoined) {
            SessionState::InRoom(membership) => Some(membership),
            SessionState::Closed => {
                self.state = SessionState::Closed;
                None
            }
            SessionState::Unjoined => None,
        }
    }

    /// Transition to `Closed`.
    ///
    /// Returns the membership to clean up only on the first call; every later
    /// call returns `None`.
    pub fn close(&mut self) -> Option<Membership> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::InRoom(membership) => Some(membership),
            SessionState::Unjoined | SessionState::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_new_session_is_unjoined() {
        // テスト項目: 新しいセッションは Unjoined 状態で始まる
        // given (前提条件):
        let session = Session::new(ConnectionId::generate());

        // when (操作):
        let state = session.state();

        // then (期待する結果):
        assert_eq!(state, &SessionState::Unjoined);
        assert!(session.membership().is_none());
    }

    #[test]
    fn test_enter_then_leave_returns_membership() {
        // テスト項目: enter 後の leave は所属していたルームを返し Unjoined に戻る
        // given (前提条件):
        let mut session = Session::new(ConnectionId::generate());
        session.enter(room("r1"), name("Alice"));

        // when (操作):
        let left = session.leave();

        // then (期待する結果):
        assert_eq!(
            left,
            Some(Membership {
                room_id: room("r1"),
                name: name("Alice"),
            })
        );
        assert_eq!(session.state(), &SessionState::Unjoined);
    }

    #[test]
    fn test_close_returns_membership_exactly_once() {
        // テスト項目: close は最初の 1 回だけ所属ルームを返す
        // given (前提条件):
        let mut session = Session::new(ConnectionId::generate());
        session.enter(room("r1"), name("Alice"));

        // when (操作):
        let first = session.close();
        let second = session.close();

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(session.is_closed());
    }

    #[test]
    fn test_closed_session_is_terminal() {
        // テスト項目: Closed 状態からは enter / leave で状態が変わらない
        // given (前提条件):
        let mut session = Session::new(ConnectionId::generate());
        session.close();

        // when (操作):
        session.enter(room("r1"), name("Alice"));
        let left = session.leave();

        // then (期待する結果):
        assert!(left.is_none());
        assert!(session.is_closed());
    }
}
