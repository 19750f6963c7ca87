//! Error types for session operations.

use gridduel_history::HistoryError;

/// Errors that can occur during session operations.
///
/// Every variant except `Persistence` is a synchronous validation
/// rejection: it leaves the board and phase untouched and is never
/// retried. `Persistence` is surfaced only where a history-write failure
/// is fatal (board setup and game termination); the session has already
/// transitioned to `Aborted` by the time the caller sees it.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No session is known for this connection or session id.
    #[error("game not found")]
    NotFound,

    /// The operation is not valid in the session's current phase.
    #[error("invalid state for this operation: {0}")]
    InvalidState(String),

    /// The requested board size is outside the allowed range.
    #[error("board size {size} outside allowed range [{min}, {max}]")]
    InvalidSize { size: usize, min: usize, max: usize },

    /// The requester is not the player allowed to perform this action.
    #[error("not authorized to perform this action")]
    NotAuthorized,

    /// The caller moved out of turn.
    #[error("it's not your turn")]
    NotYourTurn,

    /// The move targets a cell outside the board.
    #[error("cell ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// The move targets a cell that already holds a mark.
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    /// A fatal history write failed; the session was aborted.
    #[error(transparent)]
    Persistence(#[from] HistoryError),
}
