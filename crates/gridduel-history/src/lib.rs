//! The durable-history seam for Gridduel.
//!
//! Gridduel does not persist anything itself. It defines the
//! [`HistoryRecorder`] trait: four async calls covering the facts the core
//! emits during a match (players, game header, turns, outcome). A deployment
//! implements this trait against its store of choice; tests implement it
//! with in-memory fakes.
//!
//! The core passes plain value objects across this boundary. It never holds
//! or traverses persistence-layer entities.

mod error;
mod record;

pub use error::HistoryError;
pub use record::{GameId, PlayerId, TurnRecord};

use chrono::{DateTime, Utc};

/// Durable sink for player, game, and turn facts.
///
/// Shared across async tasks, so implementations must be `Send + Sync`.
/// The core never retries a failed call; any retry policy belongs to the
/// implementation.
pub trait HistoryRecorder: Send + Sync + 'static {
    /// Returns the persisted id for `name`, creating the player record on
    /// first use. Idempotent by name.
    fn upsert_player(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, HistoryError>> + Send;

    /// Creates the game header record and returns its id.
    ///
    /// Called exactly once per session, when the board size is fixed.
    fn create_game(
        &self,
        player1: PlayerId,
        player2: PlayerId,
        start_time: DateTime<Utc>,
        board_size: usize,
    ) -> impl std::future::Future<Output = Result<GameId, HistoryError>> + Send;

    /// Appends one accepted move to the game's turn history.
    fn append_turn(
        &self,
        turn: TurnRecord,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;

    /// Closes the game record with its outcome. `winner` is `None` for a
    /// draw or an abort. Called at most once per logical end-of-game event.
    fn close_game(
        &self,
        game_id: GameId,
        winner: Option<PlayerId>,
        end_time: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;
}
