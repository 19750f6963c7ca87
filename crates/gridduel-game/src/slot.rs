//! Player slots: a player's identity within a session.

use gridduel_history::PlayerId;
use gridduel_protocol::{ConnectionId, Symbol};

/// A player's identity and assigned symbol within a session.
///
/// Born when a connection registers intent to play; promoted into a
/// session at pairing, when the symbol is fixed for good. `persisted_id`
/// stays empty until the first successful history write for this player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub connection_id: ConnectionId,
    pub name: String,
    pub symbol: Symbol,
    pub persisted_id: Option<PlayerId>,
}

impl PlayerSlot {
    /// Creates a slot at pairing time, before any history write.
    pub fn new(
        connection_id: ConnectionId,
        name: impl Into<String>,
        symbol: Symbol,
    ) -> Self {
        Self {
            connection_id,
            name: name.into(),
            symbol,
            persisted_id: None,
        }
    }
}
