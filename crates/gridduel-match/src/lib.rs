//! Matchmaking for Gridduel: the waiting pool of unpaired players and the
//! matchmaker that promotes pairs of them into game sessions.
//!
//! The pool is built on sharded concurrent maps so that unrelated
//! registrations never contend; only the pairing decision itself runs
//! under a single short lock, and nothing is awaited while it is held.

mod error;
mod matchmaker;
mod pool;

pub use error::MatchError;
pub use matchmaker::{MatchOutcome, Matchmaker};
pub use pool::{WaitingPlayer, WaitingPool};
