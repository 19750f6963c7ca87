//! The pool of connections waiting for an opponent.

use std::collections::VecDeque;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gridduel_protocol::ConnectionId;
use parking_lot::Mutex;

use crate::MatchError;

/// A registered player not yet attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingPlayer {
    pub connection_id: ConnectionId,
    pub name: String,
}

/// Unpaired registrations, keyed by connection.
///
/// Display names are unique among waiting entries under case-insensitive
/// comparison. The lowercased name is claimed in `names` before the entry
/// becomes visible, so two concurrent registrations of the same name
/// cannot both succeed; the loser sees `NameTaken`. Names are released
/// when the entry leaves the pool.
///
/// `order` records arrival for first-come-first-served opponent selection.
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: DashMap<ConnectionId, WaitingPlayer>,
    names: DashMap<String, ConnectionId>,
    order: Mutex<VecDeque<ConnectionId>>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection under a display name.
    ///
    /// The name is trimmed first. Blank names and names already held by a
    /// waiting entry are refused, and a refused registration leaves the
    /// pool exactly as it was.
    pub fn register(
        &self,
        connection_id: ConnectionId,
        name: &str,
    ) -> Result<WaitingPlayer, MatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchError::EmptyName);
        }

        match self.names.entry(name.to_lowercase()) {
            Entry::Occupied(_) => {
                tracing::debug!(%connection_id, name, "name already waiting");
                Err(MatchError::NameTaken(name.to_owned()))
            }
            Entry::Vacant(slot) => {
                slot.insert(connection_id);
                let player = WaitingPlayer {
                    connection_id,
                    name: name.to_owned(),
                };
                self.entries.insert(connection_id, player.clone());
                self.order.lock().push_back(connection_id);
                tracing::info!(%connection_id, name, "player waiting for opponent");
                Ok(player)
            }
        }
    }

    /// Removes a connection from the pool, releasing its name claim.
    pub fn remove(&self, connection_id: ConnectionId) -> Option<WaitingPlayer> {
        let (_, player) = self.entries.remove(&connection_id)?;
        self.names.remove(&player.name.to_lowercase());
        self.order.lock().retain(|c| *c != connection_id);
        Some(player)
    }

    /// Returns `true` if this connection is currently waiting.
    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.entries.contains_key(&connection_id)
    }

    /// The earliest-registered waiting connection not in `excluding`.
    ///
    /// A returned candidate is not reserved: it can leave the pool before
    /// the caller consumes it, in which case the caller excludes it and
    /// asks again.
    pub fn earliest_other(&self, excluding: &[ConnectionId]) -> Option<ConnectionId> {
        self.order
            .lock()
            .iter()
            .copied()
            .find(|c| !excluding.contains(c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
