//! The live-session table.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use gridduel_protocol::{ConnectionId, SessionId};
use tokio::sync::Mutex;

use crate::{BoardLimits, GameSession, PlayerSlot};

/// A session behind its per-session lock.
///
/// All mutation of a [`GameSession`] happens under this lock, which may be
/// held across history writes. Callers must never hold two session locks
/// at once.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// All live sessions, indexed by session id and by member connection.
///
/// Both maps are sharded concurrent maps, so lookups and inserts for
/// different keys never contend. Entries for a session are inserted
/// together at creation and removed together at eviction.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SharedSession>,
    connections: DashMap<ConnectionId, SessionId>,
    limits: BoardLimits,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_limits(BoardLimits::default())
    }

    pub fn with_limits(limits: BoardLimits) -> Self {
        Self {
            sessions: DashMap::new(),
            connections: DashMap::new(),
            limits,
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a session for a freshly paired couple and indexes both
    /// connections to it.
    pub fn create(
        &self,
        player1: PlayerSlot,
        player2: PlayerSlot,
    ) -> (SessionId, SharedSession) {
        let session_id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let conn1 = player1.connection_id;
        let conn2 = player2.connection_id;

        let session = Arc::new(Mutex::new(GameSession::new(
            session_id, player1, player2, self.limits,
        )));
        self.sessions.insert(session_id, Arc::clone(&session));
        self.connections.insert(conn1, session_id);
        self.connections.insert(conn2, session_id);

        tracing::info!(%session_id, %conn1, %conn2, "session created");
        (session_id, session)
    }

    /// Looks a session up by id.
    pub fn get(&self, session_id: SessionId) -> Option<SharedSession> {
        self.sessions.get(&session_id).map(|s| Arc::clone(&s))
    }

    /// Looks up the session a connection belongs to.
    pub fn get_by_connection(
        &self,
        connection_id: ConnectionId,
    ) -> Option<(SessionId, SharedSession)> {
        let session_id = *self.connections.get(&connection_id)?;
        let session = self.get(session_id)?;
        Some((session_id, session))
    }

    /// Drops a connection's index entry. The session itself stays until
    /// evicted.
    pub fn unbind(&self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
    }

    /// Removes a session whose last member has left.
    pub fn evict(&self, session_id: SessionId) {
        if self.sessions.remove(&session_id).is_some() {
            tracing::info!(%session_id, "session evicted");
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridduel_protocol::Symbol;

    fn slots() -> (PlayerSlot, PlayerSlot) {
        (
            PlayerSlot::new(ConnectionId(1), "alice", Symbol::X),
            PlayerSlot::new(ConnectionId(2), "bob", Symbol::O),
        )
    }

    #[tokio::test]
    async fn test_create_indexes_both_connections() {
        let registry = SessionRegistry::new();
        let (p1, p2) = slots();

        let (session_id, session) = registry.create(p1, p2);

        assert_eq!(registry.session_count(), 1);
        let (found_id, found) = registry.get_by_connection(ConnectionId(1)).unwrap();
        assert_eq!(found_id, session_id);
        assert!(Arc::ptr_eq(&found, &session));
        assert!(registry.get_by_connection(ConnectionId(2)).is_some());
        assert!(registry.get_by_connection(ConnectionId(3)).is_none());
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let registry = SessionRegistry::new();
        let (id_a, _) = registry.create(
            PlayerSlot::new(ConnectionId(1), "a", Symbol::X),
            PlayerSlot::new(ConnectionId(2), "b", Symbol::O),
        );
        let (id_b, _) = registry.create(
            PlayerSlot::new(ConnectionId(3), "c", Symbol::X),
            PlayerSlot::new(ConnectionId(4), "d", Symbol::O),
        );
        assert_ne!(id_a, id_b);
        assert_eq!(registry.session_count(), 2);
    }

    #[tokio::test]
    async fn test_unbind_leaves_session_in_place() {
        let registry = SessionRegistry::new();
        let (p1, p2) = slots();
        let (session_id, _) = registry.create(p1, p2);

        registry.unbind(ConnectionId(1));

        assert!(registry.get_by_connection(ConnectionId(1)).is_none());
        assert!(registry.get(session_id).is_some());
        assert!(registry.get_by_connection(ConnectionId(2)).is_some());
    }

    #[tokio::test]
    async fn test_evict_removes_session() {
        let registry = SessionRegistry::new();
        let (p1, p2) = slots();
        let (session_id, _) = registry.create(p1, p2);

        registry.evict(session_id);

        assert_eq!(registry.session_count(), 0);
        assert!(registry.get(session_id).is_none());
        // Evicting again is harmless.
        registry.evict(session_id);
    }

    #[tokio::test]
    async fn test_custom_limits_flow_into_sessions() {
        let registry = SessionRegistry::with_limits(BoardLimits { min: 4, max: 6 });
        let (p1, p2) = slots();
        let (_, session) = registry.create(p1, p2);

        let history = NoopHistory;
        let mut guard = session.lock().await;
        assert!(matches!(
            guard.set_board_size(ConnectionId(1), 3, &history).await,
            Err(crate::GameError::InvalidSize { min: 4, max: 6, .. })
        ));
        guard.set_board_size(ConnectionId(1), 5, &history).await.unwrap();
    }

    struct NoopHistory;

    impl gridduel_history::HistoryRecorder for NoopHistory {
        async fn upsert_player(
            &self,
            _name: &str,
        ) -> Result<gridduel_history::PlayerId, gridduel_history::HistoryError> {
            Ok(gridduel_history::PlayerId(1))
        }

        async fn create_game(
            &self,
            _p1: gridduel_history::PlayerId,
            _p2: gridduel_history::PlayerId,
            _start: chrono::DateTime<chrono::Utc>,
            _size: usize,
        ) -> Result<gridduel_history::GameId, gridduel_history::HistoryError> {
            Ok(gridduel_history::GameId(1))
        }

        async fn append_turn(
            &self,
            _turn: gridduel_history::TurnRecord,
        ) -> Result<(), gridduel_history::HistoryError> {
            Ok(())
        }

        async fn close_game(
            &self,
            _game_id: gridduel_history::GameId,
            _winner: Option<gridduel_history::PlayerId>,
            _end: chrono::DateTime<chrono::Utc>,
        ) -> Result<(), gridduel_history::HistoryError> {
            Ok(())
        }
    }
}
