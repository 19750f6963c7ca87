//! Gridduel: a two-player matchmaking and turn-based board-game engine.
//!
//! This crate ties the engine together for embedders: wire types from
//! [`gridduel_protocol`], the session machinery from [`gridduel_game`],
//! matchmaking from [`gridduel_match`], and the history-store seam from
//! [`gridduel_history`], all driven through [`GameService`].
//!
//! The engine is transport-agnostic. A transport feeds events into the
//! service and delivers the returned notification batches; plugging in a
//! history store means implementing [`HistoryRecorder`].

mod error;
mod service;

pub use error::GridduelError;
pub use service::{GameService, Notifications};

/// Installs a global `tracing` subscriber that reads its filter from
/// `RUST_LOG`. Call once at startup; repeated calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

pub use gridduel_game::{
    Board, BoardLimits, Cell, DisconnectOutcome, GameError, GameSession,
    PlayerSlot, SessionRegistry, SharedSession,
};
pub use gridduel_history::{
    GameId, HistoryError, HistoryRecorder, PlayerId, TurnRecord,
};
pub use gridduel_match::{
    MatchError, MatchOutcome, Matchmaker, WaitingPlayer, WaitingPool,
};
pub use gridduel_protocol::{
    ClientEvent, ConnectionId, Phase, PlayerNumber, ServerEvent, SessionId,
    Symbol,
};
