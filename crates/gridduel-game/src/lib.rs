//! Game sessions for Gridduel.
//!
//! One [`GameSession`] is one match: two promoted player slots, a board,
//! and a forward-only phase machine running from board setup through a
//! win, draw, or abort. The [`SessionRegistry`] owns every live session
//! and the connection index that routes per-connection events to them.
//!
//! # Key types
//!
//! - [`GameSession`] — the per-match state machine
//! - [`SessionRegistry`] — session map + connection index
//! - [`Board`], [`Cell`] — the tri-state grid
//! - [`detect`] — line-completion win detection
//! - [`BoardLimits`] — allowed board-size range
//!
//! # Concurrency
//!
//! The registry's maps are per-key atomic and safe to call from any task.
//! Mutating a session (`set_board_size`, `apply_move`, `handle_disconnect`)
//! requires the per-session `tokio::sync::Mutex` the registry wraps each
//! session in; that lock stays held across the history writes folded into
//! a phase transition, so at most one mutation runs against a session at a
//! time.

mod board;
pub mod detect;
mod error;
mod registry;
mod session;
mod slot;

pub use board::{Board, BoardLimits, Cell};
pub use error::GameError;
pub use registry::{SessionRegistry, SharedSession};
pub use session::{DisconnectOutcome, GameSession};
pub use slot::PlayerSlot;
