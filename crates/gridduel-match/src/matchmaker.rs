//! Pairing waiting players into sessions.

use std::sync::Arc;

use gridduel_game::{PlayerSlot, SessionRegistry, SharedSession};
use gridduel_protocol::{ConnectionId, SessionId, Symbol};
use parking_lot::Mutex;

use crate::{WaitingPlayer, WaitingPool};

/// Result of one pairing attempt.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Two players were promoted into a new session. The caller is
    /// player 1 with `X`; the opponent drew `O`.
    SessionCreated {
        session_id: SessionId,
        session: SharedSession,
        player1: WaitingPlayer,
        player2: WaitingPlayer,
    },
    /// No opponent available; the caller stays in the pool.
    SoloWaiting,
    /// The caller is not in the pool (never registered, or already
    /// paired by a concurrent attempt).
    NotFound,
}

/// Promotes pairs of waiting players into game sessions.
///
/// The read-decide-remove-create sequence runs under one `pairing` lock so
/// that concurrent attempts cannot pair the same player twice or skip each
/// other into a three-way match. Everything inside the lock is synchronous
/// map work; nothing is awaited while it is held.
pub struct Matchmaker {
    pool: Arc<WaitingPool>,
    registry: Arc<SessionRegistry>,
    pairing: Mutex<()>,
}

impl Matchmaker {
    pub fn new(pool: Arc<WaitingPool>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            pool,
            registry,
            pairing: Mutex::new(()),
        }
    }

    /// Attempts to pair the caller with the earliest-registered other
    /// waiting player.
    ///
    /// Disconnects consume pool entries without taking the pairing lock,
    /// so a selected opponent can be gone by the time we claim them. Such
    /// candidates are skipped, and the caller's own entry is consumed only
    /// once an opponent is secured: a `SoloWaiting` answer always leaves
    /// the caller queued.
    pub fn try_match(&self, connection_id: ConnectionId) -> MatchOutcome {
        let _guard = self.pairing.lock();

        if !self.pool.contains(connection_id) {
            return MatchOutcome::NotFound;
        }

        let mut excluded = vec![connection_id];
        let player2 = loop {
            let Some(opponent_id) = self.pool.earliest_other(&excluded) else {
                return MatchOutcome::SoloWaiting;
            };
            match self.pool.remove(opponent_id) {
                Some(opponent) => break opponent,
                // Disconnected after selection; try the next arrival.
                None => excluded.push(opponent_id),
            }
        };

        let Some(player1) = self.pool.remove(connection_id) else {
            // The caller disconnected while the opponent was being
            // claimed; put the opponent back.
            if self.pool.register(player2.connection_id, &player2.name).is_err() {
                tracing::warn!(
                    connection_id = %player2.connection_id,
                    name = %player2.name,
                    "could not requeue opponent after caller vanished"
                );
            }
            return MatchOutcome::NotFound;
        };

        let (session_id, session) = self.registry.create(
            PlayerSlot::new(player1.connection_id, player1.name.clone(), Symbol::X),
            PlayerSlot::new(player2.connection_id, player2.name.clone(), Symbol::O),
        );
        tracing::info!(
            %session_id,
            player1 = %player1.name,
            player2 = %player2.name,
            "players paired"
        );

        MatchOutcome::SessionCreated {
            session_id,
            session,
            player1,
            player2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridduel_protocol::{Phase, PlayerNumber};

    fn matchmaker() -> (Arc<WaitingPool>, Arc<SessionRegistry>, Matchmaker) {
        let pool = Arc::new(WaitingPool::new());
        let registry = Arc::new(SessionRegistry::new());
        let mm = Matchmaker::new(Arc::clone(&pool), Arc::clone(&registry));
        (pool, registry, mm)
    }

    #[tokio::test]
    async fn test_try_match_unregistered_connection_not_found() {
        let (_, _, mm) = matchmaker();
        assert!(matches!(
            mm.try_match(ConnectionId(1)),
            MatchOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn test_try_match_alone_keeps_waiting() {
        let (pool, registry, mm) = matchmaker();
        pool.register(ConnectionId(1), "alice").unwrap();

        assert!(matches!(
            mm.try_match(ConnectionId(1)),
            MatchOutcome::SoloWaiting
        ));
        assert!(pool.contains(ConnectionId(1)));
        assert_eq!(registry.session_count(), 0);
    }

    #[tokio::test]
    async fn test_try_match_pairs_caller_as_player1() {
        let (pool, registry, mm) = matchmaker();
        pool.register(ConnectionId(1), "alice").unwrap();
        pool.register(ConnectionId(2), "bob").unwrap();

        // Bob triggers the pairing, so bob is player 1.
        let MatchOutcome::SessionCreated {
            session, player1, player2, ..
        } = mm.try_match(ConnectionId(2))
        else {
            panic!("expected a session");
        };

        assert_eq!(player1.name, "bob");
        assert_eq!(player2.name, "alice");
        assert!(pool.is_empty());
        assert_eq!(registry.session_count(), 1);

        let game = session.lock().await;
        assert_eq!(game.phase(), Phase::AwaitingBoardSize);
        assert_eq!(game.slot(PlayerNumber::P1).unwrap().symbol, Symbol::X);
        assert_eq!(game.slot(PlayerNumber::P2).unwrap().symbol, Symbol::O);
        assert_eq!(game.seat_of(ConnectionId(2)), Some(PlayerNumber::P1));
    }

    #[tokio::test]
    async fn test_try_match_picks_earliest_waiter() {
        let (pool, _, mm) = matchmaker();
        pool.register(ConnectionId(1), "first").unwrap();
        pool.register(ConnectionId(2), "second").unwrap();
        pool.register(ConnectionId(3), "third").unwrap();

        let MatchOutcome::SessionCreated { player2, .. } = mm.try_match(ConnectionId(3))
        else {
            panic!("expected a session");
        };

        assert_eq!(player2.name, "first");
        assert!(pool.contains(ConnectionId(2)), "second still waits");
    }

    #[tokio::test]
    async fn test_paired_player_cannot_match_again() {
        let (pool, registry, mm) = matchmaker();
        pool.register(ConnectionId(1), "alice").unwrap();
        pool.register(ConnectionId(2), "bob").unwrap();
        mm.try_match(ConnectionId(1));

        assert!(matches!(
            mm.try_match(ConnectionId(1)),
            MatchOutcome::NotFound
        ));
        assert_eq!(registry.session_count(), 1);
    }

    #[tokio::test]
    async fn test_opponent_already_gone_keeps_caller_queued() {
        let (pool, registry, mm) = matchmaker();
        pool.register(ConnectionId(1), "caller").unwrap();
        pool.register(ConnectionId(2), "leaver").unwrap();

        // The opponent disconnects before the pairing attempt runs.
        pool.remove(ConnectionId(2));

        assert!(matches!(
            mm.try_match(ConnectionId(1)),
            MatchOutcome::SoloWaiting
        ));
        assert!(pool.contains(ConnectionId(1)), "caller must stay queued");
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_opponent_leaving_mid_match_never_drops_caller() {
        for _ in 0..500 {
            let (pool, registry, mm) = matchmaker();
            pool.register(ConnectionId(1), "caller").unwrap();
            pool.register(ConnectionId(2), "leaver").unwrap();

            let leaver_pool = Arc::clone(&pool);
            let leaving =
                std::thread::spawn(move || leaver_pool.remove(ConnectionId(2)));
            let outcome = mm.try_match(ConnectionId(1));
            leaving.join().unwrap();

            match outcome {
                MatchOutcome::SessionCreated { .. } => {
                    assert_eq!(registry.session_count(), 1);
                    assert!(!pool.contains(ConnectionId(1)));
                }
                MatchOutcome::SoloWaiting => {
                    assert!(
                        pool.contains(ConnectionId(1)),
                        "caller silently dropped from the pool"
                    );
                    assert_eq!(registry.session_count(), 0);
                }
                MatchOutcome::NotFound => panic!("caller was registered"),
            }
        }
    }

    #[test]
    fn test_caller_leaving_mid_match_requeues_opponent() {
        for _ in 0..500 {
            let (pool, registry, mm) = matchmaker();
            pool.register(ConnectionId(1), "caller").unwrap();
            pool.register(ConnectionId(2), "opponent").unwrap();

            let leaver_pool = Arc::clone(&pool);
            let leaving =
                std::thread::spawn(move || leaver_pool.remove(ConnectionId(1)));
            let outcome = mm.try_match(ConnectionId(1));
            leaving.join().unwrap();

            match outcome {
                MatchOutcome::SessionCreated { .. } => {
                    assert_eq!(registry.session_count(), 1);
                }
                MatchOutcome::NotFound => {
                    assert!(
                        pool.contains(ConnectionId(2)),
                        "opponent silently dropped from the pool"
                    );
                    assert_eq!(registry.session_count(), 0);
                }
                MatchOutcome::SoloWaiting => {
                    panic!("an opponent was available")
                }
            }
        }
    }

    #[test]
    fn test_concurrent_matching_pairs_everyone_once() {
        let (pool, registry, mm) = matchmaker();
        let mm = Arc::new(mm);
        for i in 0..8u64 {
            pool.register(ConnectionId(i), format!("player-{i}").as_str())
                .unwrap();
        }

        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let mm = Arc::clone(&mm);
                std::thread::spawn(move || mm.try_match(ConnectionId(i)))
            })
            .collect();
        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|o| matches!(o, MatchOutcome::SessionCreated { .. }))
            .count();

        assert_eq!(created, 4);
        assert_eq!(registry.session_count(), 4);
        assert!(pool.is_empty());
    }
}
