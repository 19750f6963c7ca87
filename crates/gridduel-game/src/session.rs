//! The per-match state machine.

use chrono::{DateTime, Utc};
use gridduel_history::{HistoryRecorder, TurnRecord};
use gridduel_protocol::{ConnectionId, Phase, PlayerNumber, SessionId};

use crate::{detect, Board, BoardLimits, GameError, PlayerSlot};

/// What a disconnect did to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// Display name of the player who left.
    pub departed_name: String,
    /// `true` iff this disconnect moved the session to `Aborted`.
    /// A disconnect from an already-terminal session reports `false`.
    pub freshly_aborted: bool,
    /// The opponent's connection, if their slot is still attached.
    /// Used to address the final notification.
    pub remaining_connection: Option<ConnectionId>,
    /// `true` once both slot references are cleared; the caller then
    /// evicts the session from the registry.
    pub session_empty: bool,
}

/// One match: two player slots, a board, and a forward-only phase.
///
/// Mutating operations must be externally serialized per session (the
/// registry wraps each session in a `tokio::sync::Mutex`). The methods
/// themselves enforce the phase machine: every rejection leaves the board
/// and phase exactly as they were.
#[derive(Debug)]
pub struct GameSession {
    session_id: SessionId,
    player1: Option<PlayerSlot>,
    player2: Option<PlayerSlot>,
    board: Option<Board>,
    phase: Phase,
    persisted_game_id: Option<gridduel_history::GameId>,
    start_time: DateTime<Utc>,
    limits: BoardLimits,
}

impl GameSession {
    /// Creates a session from two freshly promoted slots, in phase
    /// `AwaitingBoardSize`.
    pub fn new(
        session_id: SessionId,
        player1: PlayerSlot,
        player2: PlayerSlot,
        limits: BoardLimits,
    ) -> Self {
        Self {
            session_id,
            player1: Some(player1),
            player2: Some(player2),
            board: None,
            phase: Phase::AwaitingBoardSize,
            persisted_game_id: None,
            start_time: Utc::now(),
            limits,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// The slot in the given seat, if still attached.
    pub fn slot(&self, seat: PlayerNumber) -> Option<&PlayerSlot> {
        match seat {
            PlayerNumber::P1 => self.player1.as_ref(),
            PlayerNumber::P2 => self.player2.as_ref(),
        }
    }

    /// The seat occupied by this connection, if any.
    pub fn seat_of(&self, connection_id: ConnectionId) -> Option<PlayerNumber> {
        if self
            .player1
            .as_ref()
            .is_some_and(|s| s.connection_id == connection_id)
        {
            Some(PlayerNumber::P1)
        } else if self
            .player2
            .as_ref()
            .is_some_and(|s| s.connection_id == connection_id)
        {
            Some(PlayerNumber::P2)
        } else {
            None
        }
    }

    /// Connections of every still-attached slot, for notification fan-out.
    pub fn attached_connections(&self) -> Vec<ConnectionId> {
        self.player1
            .iter()
            .chain(self.player2.iter())
            .map(|s| s.connection_id)
            .collect()
    }

    /// Fixes the board size and opens play.
    ///
    /// Valid only in `AwaitingBoardSize`, only for player 1, and only for
    /// sizes within the configured limits. On success the board is
    /// allocated, the game header is persisted (both players upserted, the
    /// game record created), and the phase becomes `TurnOf(P1)`.
    ///
    /// A history failure here is fatal: the session transitions to
    /// `Aborted` and the error is surfaced. The session must never claim a
    /// persisted identity it does not have.
    pub async fn set_board_size<H: HistoryRecorder>(
        &mut self,
        requester: ConnectionId,
        size: usize,
        history: &H,
    ) -> Result<(), GameError> {
        if self.phase != Phase::AwaitingBoardSize {
            return Err(GameError::InvalidState(format!(
                "cannot set board size in phase {}",
                self.phase
            )));
        }
        if self.seat_of(requester) != Some(PlayerNumber::P1) {
            return Err(GameError::NotAuthorized);
        }
        if !self.limits.contains(size) {
            return Err(GameError::InvalidSize {
                size,
                min: self.limits.min,
                max: self.limits.max,
            });
        }
        let (Some(p1_name), Some(p2_name)) = (
            self.player1.as_ref().map(|s| s.name.clone()),
            self.player2.as_ref().map(|s| s.name.clone()),
        ) else {
            // A slot vanished between pairing and setup (opponent raced a
            // disconnect past the terminal check). Nothing persisted yet.
            self.phase = Phase::Aborted;
            tracing::warn!(
                session_id = %self.session_id,
                "slot missing at board setup, session aborted"
            );
            return Err(GameError::InvalidState(
                "opponent missing at board setup".into(),
            ));
        };

        self.board = Some(Board::new(size));

        match self.persist_header(&p1_name, &p2_name, size, history).await {
            Ok(()) => {
                self.phase = Phase::TurnOf(PlayerNumber::P1);
                tracing::info!(
                    session_id = %self.session_id,
                    size,
                    "board size set, player 1 to move"
                );
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Aborted;
                self.persisted_game_id = None;
                tracing::error!(
                    session_id = %self.session_id,
                    error = %e,
                    "history write failed during setup, session aborted"
                );
                Err(GameError::Persistence(e))
            }
        }
    }

    async fn persist_header<H: HistoryRecorder>(
        &mut self,
        p1_name: &str,
        p2_name: &str,
        size: usize,
        history: &H,
    ) -> Result<(), gridduel_history::HistoryError> {
        let p1_id = history.upsert_player(p1_name).await?;
        let p2_id = history.upsert_player(p2_name).await?;
        let game_id = history
            .create_game(p1_id, p2_id, self.start_time, size)
            .await?;

        if let Some(slot) = self.player1.as_mut() {
            slot.persisted_id = Some(p1_id);
        }
        if let Some(slot) = self.player2.as_mut() {
            slot.persisted_id = Some(p2_id);
        }
        self.persisted_game_id = Some(game_id);
        Ok(())
    }

    /// Applies one move and returns the resulting phase.
    ///
    /// The caller must be the player whose turn it is; the target cell
    /// must be on the board and empty. An accepted move marks the cell,
    /// appends to the turn history (best effort: a failure is logged and
    /// otherwise ignored), then resolves termination: completed line,
    /// full board, or turn flip.
    ///
    /// Closing the persisted record at a win or draw is fatal on failure,
    /// same as setup: the session aborts and the error is surfaced.
    pub async fn apply_move<H: HistoryRecorder>(
        &mut self,
        connection_id: ConnectionId,
        row: usize,
        col: usize,
        history: &H,
    ) -> Result<Phase, GameError> {
        let Some(turn_seat) = self.phase.turn() else {
            return Err(GameError::InvalidState(format!(
                "game is not active (phase {})",
                self.phase
            )));
        };
        if self.seat_of(connection_id) != Some(turn_seat) {
            return Err(GameError::NotYourTurn);
        }
        let Some(board) = self.board.as_mut() else {
            return Err(GameError::InvalidState(
                "board not allocated".into(),
            ));
        };
        if !board.in_bounds(row, col) {
            return Err(GameError::OutOfBounds {
                row,
                col,
                size: board.size(),
            });
        }
        if board.cell(row, col) != Some(crate::Cell::Empty) {
            return Err(GameError::CellOccupied { row, col });
        }

        let symbol = turn_seat.symbol();
        board.mark(row, col, symbol);
        let line_complete = detect::winner(board).is_some();
        let board_full = board.is_full();
        tracing::debug!(
            session_id = %self.session_id,
            seat = %turn_seat,
            row,
            col,
            "move applied"
        );

        self.append_turn_best_effort(turn_seat, row, col, history).await;

        if line_complete {
            // Move-by-move evaluation: the completed line belongs to the
            // mover.
            self.finish(Phase::Won(turn_seat), Some(turn_seat), history)
                .await?;
        } else if board_full {
            self.finish(Phase::Draw, None, history).await?;
        } else {
            self.phase = Phase::TurnOf(turn_seat.other());
        }
        Ok(self.phase)
    }

    /// Appends the accepted move to the turn history. Failure does not
    /// affect the game outcome.
    async fn append_turn_best_effort<H: HistoryRecorder>(
        &self,
        seat: PlayerNumber,
        row: usize,
        col: usize,
        history: &H,
    ) {
        let (Some(game_id), Some(player_id)) = (
            self.persisted_game_id,
            self.slot(seat).and_then(|s| s.persisted_id),
        ) else {
            return;
        };
        let turn = TurnRecord {
            game_id,
            player_id,
            row,
            col,
            timestamp: Utc::now(),
        };
        if let Err(e) = history.append_turn(turn).await {
            tracing::warn!(
                session_id = %self.session_id,
                error = %e,
                "turn history append failed, move stands"
            );
        }
    }

    /// Transitions to a terminal play outcome and closes the persisted
    /// record. A close failure aborts the session instead.
    async fn finish<H: HistoryRecorder>(
        &mut self,
        outcome: Phase,
        winner: Option<PlayerNumber>,
        history: &H,
    ) -> Result<(), GameError> {
        let winner_id = winner
            .and_then(|seat| self.slot(seat))
            .and_then(|s| s.persisted_id);

        if let Some(game_id) = self.persisted_game_id {
            if let Err(e) = history.close_game(game_id, winner_id, Utc::now()).await {
                self.phase = Phase::Aborted;
                tracing::error!(
                    session_id = %self.session_id,
                    error = %e,
                    "history close failed at game end, session aborted"
                );
                return Err(GameError::Persistence(e));
            }
        }

        self.phase = outcome;
        tracing::info!(
            session_id = %self.session_id,
            phase = %outcome,
            "game finished"
        );
        Ok(())
    }

    /// Handles one player's disconnect.
    ///
    /// Returns `None` when the connection matches neither slot. Otherwise:
    /// if the phase is not yet terminal the session aborts exactly once,
    /// closing the persisted record with no winner (best effort: the
    /// in-memory abort holds even if the close fails). Only the departing
    /// slot is cleared; the opponent's slot stays attached to the aborted
    /// session so a final notification can still be addressed to them.
    pub async fn handle_disconnect<H: HistoryRecorder>(
        &mut self,
        connection_id: ConnectionId,
        history: &H,
    ) -> Option<DisconnectOutcome> {
        let seat = self.seat_of(connection_id)?;

        let freshly_aborted = !self.phase.is_terminal();
        if freshly_aborted {
            self.phase = Phase::Aborted;
            tracing::info!(
                session_id = %self.session_id,
                seat = %seat,
                "player disconnected, session aborted"
            );
            if let Some(game_id) = self.persisted_game_id {
                if let Err(e) = history.close_game(game_id, None, Utc::now()).await {
                    tracing::warn!(
                        session_id = %self.session_id,
                        error = %e,
                        "history close failed on abort, abort stands"
                    );
                }
            }
        }

        let departed = match seat {
            PlayerNumber::P1 => self.player1.take(),
            PlayerNumber::P2 => self.player2.take(),
        };
        let departed_name = departed.map(|s| s.name).unwrap_or_default();
        let remaining_connection = self
            .slot(seat.other())
            .map(|s| s.connection_id);

        Some(DisconnectOutcome {
            departed_name,
            freshly_aborted,
            remaining_connection,
            session_empty: self.player1.is_none() && self.player2.is_none(),
        })
    }
}
