//! The engine facade: one inbound event in, a batch of notifications out.

use std::sync::Arc;

use gridduel_game::{GameError, SessionRegistry};
use gridduel_history::HistoryRecorder;
use gridduel_match::{MatchOutcome, Matchmaker, WaitingPool};
use gridduel_protocol::{
    ClientEvent, ConnectionId, Phase, PlayerNumber, ServerEvent, SessionId,
};

/// Notifications to deliver, addressed by connection.
pub type Notifications = Vec<(ConnectionId, ServerEvent)>;

/// Drives matchmaking and game sessions for an external transport.
///
/// The transport feeds inbound events in and delivers the returned
/// notifications out; it owns connection ids and reports disconnects via
/// [`GameService::disconnected`]. The service never pushes on its own.
pub struct GameService<H: HistoryRecorder> {
    pool: Arc<WaitingPool>,
    registry: Arc<SessionRegistry>,
    matchmaker: Matchmaker,
    history: H,
}

impl<H: HistoryRecorder> GameService<H> {
    pub fn new(history: H) -> Self {
        Self::with_registry(history, Arc::new(SessionRegistry::new()))
    }

    pub fn with_registry(history: H, registry: Arc<SessionRegistry>) -> Self {
        let pool = Arc::new(WaitingPool::new());
        let matchmaker = Matchmaker::new(Arc::clone(&pool), Arc::clone(&registry));
        Self {
            pool,
            registry,
            matchmaker,
            history,
        }
    }

    /// Dispatches one wire event from the transport.
    pub async fn handle_event(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Notifications {
        match event {
            ClientEvent::RegisterIntent { name } => {
                self.register_intent(connection_id, &name).await
            }
            ClientEvent::RequestBoardSize { session_id, size } => {
                self.request_board_size(connection_id, session_id, size).await
            }
            ClientEvent::SubmitMove { session_id, row, col } => {
                self.submit_move(connection_id, session_id, row, col).await
            }
        }
    }

    /// Registers a connection under a display name and attempts pairing.
    pub async fn register_intent(
        &self,
        connection_id: ConnectionId,
        name: &str,
    ) -> Notifications {
        if let Err(e) = self.pool.register(connection_id, name) {
            tracing::debug!(%connection_id, error = %e, "registration refused");
            return vec![(connection_id, ServerEvent::NameConflict)];
        }

        let mut out = vec![(connection_id, ServerEvent::Waiting)];
        match self.matchmaker.try_match(connection_id) {
            MatchOutcome::SessionCreated {
                session_id,
                player1,
                player2,
                ..
            } => {
                for (member, you_are_player1) in
                    [(&player1, true), (&player2, false)]
                {
                    out.push((
                        member.connection_id,
                        ServerEvent::GameFound {
                            session_id,
                            player1_name: player1.name.clone(),
                            player2_name: player2.name.clone(),
                            your_symbol: if you_are_player1 {
                                PlayerNumber::P1.symbol()
                            } else {
                                PlayerNumber::P2.symbol()
                            },
                            you_are_player1,
                        },
                    ));
                }
            }
            MatchOutcome::SoloWaiting => {}
            // A concurrent registration paired this connection already and
            // produced the GameFound batch itself.
            MatchOutcome::NotFound => {}
        }
        out
    }

    /// Fixes the board size for a session. Player 1 only, once per game.
    pub async fn request_board_size(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
        size: usize,
    ) -> Notifications {
        let Some(session) = self.registry.get(session_id) else {
            return error_to(connection_id, &GameError::NotFound.to_string());
        };

        let mut game = session.lock().await;
        match game
            .set_board_size(connection_id, size, &self.history)
            .await
        {
            Ok(()) => {
                let first_player_name = game
                    .slot(PlayerNumber::P1)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                let Some(board) = game.board() else {
                    return error_to(connection_id, "board not allocated");
                };
                let started = ServerEvent::GameStarted {
                    session_id,
                    board_size: board.size(),
                    first_player_name,
                };
                game.attached_connections()
                    .into_iter()
                    .map(|conn| (conn, started.clone()))
                    .collect()
            }
            Err(e) => error_to(connection_id, &e.to_string()),
        }
    }

    /// Applies one move. The session is resolved through the connection
    /// index; the wire-supplied session id is advisory.
    pub async fn submit_move(
        &self,
        connection_id: ConnectionId,
        _session_id: SessionId,
        row: usize,
        col: usize,
    ) -> Notifications {
        let Some((_, session)) = self.registry.get_by_connection(connection_id)
        else {
            return error_to(connection_id, &GameError::NotFound.to_string());
        };

        let mut game = session.lock().await;
        let mover = game.phase().turn();
        match game
            .apply_move(connection_id, row, col, &self.history)
            .await
        {
            Ok(new_phase) => {
                let Some(mover) = mover else {
                    return error_to(connection_id, "game is not active");
                };
                self.broadcast_move(&game, mover, row, col, new_phase)
            }
            Err(e) => {
                tracing::debug!(%connection_id, error = %e, "move rejected");
                error_to(connection_id, &e.to_string())
            }
        }
    }

    fn broadcast_move(
        &self,
        game: &gridduel_game::GameSession,
        mover: PlayerNumber,
        row: usize,
        col: usize,
        new_phase: Phase,
    ) -> Notifications {
        let name_of = |seat: PlayerNumber| {
            game.slot(seat).map(|s| s.name.clone()).unwrap_or_default()
        };

        let applied = ServerEvent::MoveApplied {
            row,
            col,
            symbol: mover.symbol(),
            new_phase,
            next_player_name: new_phase.turn().map(name_of),
        };
        let game_over = new_phase.is_terminal().then(|| ServerEvent::GameOver {
            phase: new_phase,
            winner_name: match new_phase {
                Phase::Won(seat) => Some(name_of(seat)),
                _ => None,
            },
        });

        let mut out = Notifications::new();
        for conn in game.attached_connections() {
            out.push((conn, applied.clone()));
            if let Some(over) = &game_over {
                out.push((conn, over.clone()));
            }
        }
        out
    }

    /// Reacts to a transport-reported disconnect.
    ///
    /// A waiting player is silently dropped from the pool. An active
    /// player's session aborts (at most once); the remaining player is
    /// told, the connection is unbound, and a fully vacated session is
    /// evicted.
    pub async fn disconnected(&self, connection_id: ConnectionId) -> Notifications {
        if self.pool.remove(connection_id).is_some() {
            tracing::info!(%connection_id, "waiting player left");
            return Notifications::new();
        }
        let Some((session_id, session)) =
            self.registry.get_by_connection(connection_id)
        else {
            return Notifications::new();
        };

        let mut game = session.lock().await;
        let Some(outcome) = game
            .handle_disconnect(connection_id, &self.history)
            .await
        else {
            self.registry.unbind(connection_id);
            return Notifications::new();
        };
        self.registry.unbind(connection_id);
        if outcome.session_empty {
            self.registry.evict(session_id);
        }

        match (outcome.freshly_aborted, outcome.remaining_connection) {
            (true, Some(opponent)) => vec![(
                opponent,
                ServerEvent::OpponentDisconnected {
                    name: outcome.departed_name,
                },
            )],
            _ => Notifications::new(),
        }
    }

    pub fn waiting_count(&self) -> usize {
        self.pool.len()
    }

    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }
}

fn error_to(connection_id: ConnectionId, reason: &str) -> Notifications {
    vec![(
        connection_id,
        ServerEvent::Error {
            reason: reason.to_owned(),
        },
    )]
}
