//! Unified error type for embedders of the full engine.

use gridduel_game::GameError;
use gridduel_history::HistoryError;
use gridduel_match::MatchError;

/// Any error the engine can produce, for callers that consume the crates
/// through this facade.
#[derive(Debug, thiserror::Error)]
pub enum GridduelError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    History(#[from] HistoryError),
}
