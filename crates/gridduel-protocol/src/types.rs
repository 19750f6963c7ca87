//! Identity newtypes and the shared game vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for one client connection.
///
/// Assigned by the transport when a client connects; the core treats it as
/// opaque. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A unique identifier for one match, from pairing through termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// The marker assigned to a player at pairing time, fixed for the
/// session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The opposing symbol.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// Which of a session's two seats a player occupies.
///
/// Player 1 always plays [`Symbol::X`] and moves first; player 2 plays
/// [`Symbol::O`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerNumber {
    P1,
    P2,
}

impl PlayerNumber {
    /// The opposing seat.
    pub fn other(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    /// The symbol this seat plays for the whole session.
    pub fn symbol(self) -> Symbol {
        match self {
            Self::P1 => Symbol::X,
            Self::P2 => Symbol::O,
        }
    }
}

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
        }
    }
}

/// The state-machine position of a session.
///
/// Transitions only move forward:
///
/// ```text
/// AwaitingBoardSize → TurnOf(P1) ⇄ TurnOf(P2) → Won(·) | Draw
///         │                 │
///         └────────────► Aborted (disconnect or fatal persistence failure)
/// ```
///
/// `Won`, `Draw`, and `Aborted` are terminal: a session in a terminal
/// phase rejects every further mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Freshly paired; waiting for player 1 to choose the board size.
    AwaitingBoardSize,
    /// The given seat may move.
    TurnOf(PlayerNumber),
    /// The given seat completed a line.
    Won(PlayerNumber),
    /// The board filled with no completed line.
    Draw,
    /// Ended early: a player disconnected, or a setup/termination
    /// persistence write failed.
    Aborted,
}

impl Phase {
    /// Returns `true` once no further mutation is permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won(_) | Self::Draw | Self::Aborted)
    }

    /// Returns the seat whose turn it is, if the game is mid-play.
    pub fn turn(&self) -> Option<PlayerNumber> {
        match self {
            Self::TurnOf(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingBoardSize => write!(f, "AwaitingBoardSize"),
            Self::TurnOf(n) => write!(f, "TurnOf({n})"),
            Self::Won(n) => write!(f, "Won({n})"),
            Self::Draw => write!(f, "Draw"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}
