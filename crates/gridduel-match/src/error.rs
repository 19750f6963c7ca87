//! Matchmaking rejections.

/// Why a registration was refused.
///
/// Both variants are presented identically to the other side of the wire
/// (a name conflict); the distinction only matters for logs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MatchError {
    /// The submitted name was empty or all whitespace.
    #[error("player name is empty")]
    EmptyName,

    /// Another waiting or playing registration already holds this name.
    #[error("player name {0:?} is already taken")]
    NameTaken(String),
}
