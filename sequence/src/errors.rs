use crate::{Card, IllegalClaim, Seat};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The error type for the game engine.
pub enum GameError {
    UnsupportedPlayerCount { count: usize },
    UnknownSeat { seat: Seat },
    NotYourTurn { seat: Seat, current: Seat },
    CardNotInHand { card: Card },
    /// The card has no legal target. It has to be exchanged, which does not use up the turn.
    DeadCard { card: Card },
    /// An exchange was requested for a card that can still be played.
    NotDead { card: Card },
    IllegalClaim { card: Card, err: IllegalClaim },
    /// Both the draw pile and the discard pile are empty.
    CardsExhausted,
    GameOver,
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::IllegalClaim { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::UnsupportedPlayerCount { count } => write!(
                f,
                "A game cannot be dealt for {} players, supported counts are 2, 3, 4, 6, 8, 9, 10 and 12",
                count
            ),
            GameError::UnknownSeat { seat } => write!(f, "There is no player at {}", seat),
            GameError::NotYourTurn { seat, current } => {
                write!(f, "It is not the turn of {}, {} is playing", seat, current)
            }
            GameError::CardNotInHand { card } => {
                write!(f, "Tried to play {}, which is not in the player's hand", card)
            }
            GameError::DeadCard { card } => {
                write!(f, "{} has no legal target and must be exchanged", card)
            }
            GameError::NotDead { card } => {
                write!(f, "{} can still be played and cannot be exchanged", card)
            }
            GameError::IllegalClaim { card, err } => write!(f, "Cannot play {}: {}", card, err),
            GameError::CardsExhausted => write!(f, "No cards left to draw"),
            GameError::GameOver => write!(f, "The game is already over"),
        }
    }
}
