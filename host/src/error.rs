use sequence::{GameError, Seat};
use thiserror::Error;

/// Why the host turned down a request or a lobby operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("The lobby is not open")]
    LobbyClosed,
    #[error("The lobby is full, at most {max} players can join")]
    LobbyFull { max: usize },
    #[error("Cannot start a game with {count} players, 2 or 3 are supported")]
    InvalidLobby { count: usize },
    #[error("A game with {count} players needs teams, which are not supported")]
    TeamsRequired { count: usize },
    #[error("This request needs a player id")]
    MissingPlayerId,
    #[error("Unknown player id {player_id}")]
    UnknownPlayer { player_id: String },
    #[error("It is not the turn of {seat}")]
    NotYourTurn { seat: Seat },
    #[error("No game is being played")]
    NotPlaying,
    #[error(transparent)]
    Game(#[from] GameError),
}
