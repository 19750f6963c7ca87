//! Wire-level vocabulary for Gridduel.
//!
//! This crate defines the types that cross the boundary between the core
//! and the transport that drives it:
//!
//! - **Identity** ([`ConnectionId`], [`SessionId`]) — who is talking and
//!   which match they are in.
//! - **Game vocabulary** ([`Symbol`], [`PlayerNumber`], [`Phase`]) — the
//!   pieces of game state that appear in notifications.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — what clients send in
//!   and what the core hands back out for delivery.
//!
//! The core never talks to a socket itself. A transport decodes inbound
//! bytes into [`ClientEvent`]s, calls the service layer, and encodes the
//! returned [`ServerEvent`]s for delivery.

mod event;
mod types;

pub use event::{ClientEvent, ServerEvent};
pub use types::{ConnectionId, Phase, PlayerNumber, SessionId, Symbol};
