//! Value objects passed across the history boundary.

use std::fmt;

use chrono::{DateTime, Utc};

/// The persisted id of a player record, stable across games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// The persisted id of a game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(pub i64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// One accepted move, ready to append to a game's turn history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRecord {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub row: usize,
    pub col: usize,
    pub timestamp: DateTime<Utc>,
}
