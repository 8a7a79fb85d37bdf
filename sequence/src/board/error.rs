use crate::{Card, CellCard, Coord, Seat};

/// The error type for [`Board::claim_cell()`](crate::Board::claim_cell), i.e. for playing a single card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalClaim {
    OutOfBounds { coord: Coord },
    WildCell { coord: Coord },
    AlreadyOwned { coord: Coord },
    OwnedByOpponent { coord: Coord, owner: Seat },
    NothingToRemove { coord: Coord },
    CardMismatch { coord: Coord, cell_card: CellCard, card: Card },
}

impl std::error::Error for IllegalClaim {}

impl std::fmt::Display for IllegalClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalClaim::OutOfBounds { coord } =>
                write!(f, "Cell {} is outside of the board", coord),
            IllegalClaim::WildCell { coord } =>
                write!(f, "Cell {} is a wild corner and cannot be played", coord),
            IllegalClaim::AlreadyOwned { coord } =>
                write!(f, "Cell {} is already yours", coord),
            IllegalClaim::OwnedByOpponent { coord, owner } =>
                write!(f, "Cell {} is owned by {}, only a one-eyed jack can remove it", coord, owner),
            IllegalClaim::NothingToRemove { coord } =>
                write!(f, "A one-eyed jack was played on cell {}, which nobody owns", coord),
            IllegalClaim::CardMismatch { coord, cell_card, card } =>
                write!(f, "Card {} does not match cell {}, which shows {}", card, coord, cell_card),
        }
    }
}

/// The error type for [`Board::from_layout()`](crate::Board::from_layout).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidLayout {
    WrongDimensions { rows: usize, columns: usize },
    JackOnBoard { card: Card },
    CardCount { card: Card, count: usize },
    WildCount { count: usize },
    OwnedWildCell { coord: Coord },
}

impl std::error::Error for InvalidLayout {}

impl std::fmt::Display for InvalidLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidLayout::WrongDimensions { rows, columns } =>
                write!(f, "Board must be 10x10, got {} rows and {} columns", rows, columns),
            InvalidLayout::JackOnBoard { card } =>
                write!(f, "Jacks are not printed on the board, found {}", card),
            InvalidLayout::CardCount { card, count } =>
                write!(f, "Card {} must appear exactly twice, found {} times", card, count),
            InvalidLayout::WildCount { count } =>
                write!(f, "Board must have exactly 4 wild cells, found {}", count),
            InvalidLayout::OwnedWildCell { coord } =>
                write!(f, "Wild cell {} cannot have an owner", coord),
        }
    }
}
