//! Inbound and outbound events.
//!
//! [`ClientEvent`] is what a transport decodes from the wire and feeds into
//! the service layer. The sending connection's [`ConnectionId`] is not part
//! of the payload: the transport already knows which connection a message
//! arrived on and passes it alongside. Disconnects are likewise a transport
//! callback, not a wire message.
//!
//! [`ServerEvent`] is a notification addressed to one connection. The
//! service layer returns `(ConnectionId, ServerEvent)` pairs; the transport
//! encodes and delivers them.

use serde::{Deserialize, Serialize};

use crate::{Phase, SessionId, Symbol};

/// A request from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// "I want to play, under this display name."
    RegisterIntent { name: String },

    /// Player 1's board-size choice for a freshly paired session.
    RequestBoardSize { session_id: SessionId, size: usize },

    /// A move at the given cell. `session_id` is advisory; the core
    /// resolves the session through the connection index.
    SubmitMove {
        session_id: SessionId,
        row: usize,
        col: usize,
    },
}

/// A notification for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Registration rejected: the name is blank or already held by a
    /// waiting player (case-insensitive).
    NameConflict,

    /// Registered and queued; no opponent available yet.
    Waiting,

    /// Paired into a session. Each player receives their own symbol and
    /// whether they are player 1 (who chooses the board size and moves
    /// first).
    GameFound {
        session_id: SessionId,
        player1_name: String,
        player2_name: String,
        your_symbol: Symbol,
        you_are_player1: bool,
    },

    /// The board size is fixed and play begins.
    GameStarted {
        session_id: SessionId,
        board_size: usize,
        first_player_name: String,
    },

    /// A move was accepted. `next_player_name` is present while the game
    /// continues and absent once `new_phase` is terminal.
    MoveApplied {
        row: usize,
        col: usize,
        symbol: Symbol,
        new_phase: Phase,
        next_player_name: Option<String>,
    },

    /// The game reached a terminal phase. `winner_name` is absent for a
    /// draw.
    GameOver {
        phase: Phase,
        winner_name: Option<String>,
    },

    /// The opponent disconnected and the session was aborted.
    OpponentDisconnected { name: String },

    /// A request was rejected; `reason` is human-readable.
    Error { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerNumber;

    #[test]
    fn test_client_event_register_intent_json_format() {
        let event = ClientEvent::RegisterIntent {
            name: "alice".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "RegisterIntent");
        assert_eq!(json["name"], "alice");
    }

    #[test]
    fn test_client_event_submit_move_round_trip() {
        let event = ClientEvent::SubmitMove {
            session_id: SessionId(4),
            row: 1,
            col: 2,
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ClientEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_client_event_request_board_size_json_format() {
        let event = ClientEvent::RequestBoardSize {
            session_id: SessionId(9),
            size: 5,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "RequestBoardSize");
        assert_eq!(json["session_id"], 9);
        assert_eq!(json["size"], 5);
    }

    #[test]
    fn test_server_event_game_found_json_format() {
        let event = ServerEvent::GameFound {
            session_id: SessionId(1),
            player1_name: "alice".into(),
            player2_name: "bob".into(),
            your_symbol: Symbol::O,
            you_are_player1: false,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "GameFound");
        assert_eq!(json["session_id"], 1);
        assert_eq!(json["your_symbol"], "O");
        assert_eq!(json["you_are_player1"], false);
    }

    #[test]
    fn test_server_event_move_applied_terminal_has_no_next_player() {
        let event = ServerEvent::MoveApplied {
            row: 0,
            col: 2,
            symbol: Symbol::X,
            new_phase: Phase::Won(PlayerNumber::P1),
            next_player_name: None,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "MoveApplied");
        assert!(json["next_player_name"].is_null());
    }

    #[test]
    fn test_server_event_game_over_draw_round_trip() {
        let event = ServerEvent::GameOver {
            phase: Phase::Draw,
            winner_name: None,
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_server_event_unit_variants_round_trip() {
        for event in [ServerEvent::NameConflict, ServerEvent::Waiting] {
            let bytes = serde_json::to_vec(&event).unwrap();
            let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(event, decoded);
        }
    }

    #[test]
    fn test_server_event_opponent_disconnected_json_format() {
        let event = ServerEvent::OpponentDisconnected {
            name: "bob".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "OpponentDisconnected");
        assert_eq!(json["name"], "bob");
    }

    #[test]
    fn test_decode_unknown_event_type_returns_error() {
        let unknown = r#"{"type": "Teleport", "distance": 9000}"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
