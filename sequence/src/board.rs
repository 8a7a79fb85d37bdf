mod error;
mod layout;

use std::collections::HashMap;

pub use error::*;
pub use layout::*;
use serde::{Deserialize, Serialize};

use crate::{full_deck, Card, CellCard, Rank};

pub const BOARD_SIZE: usize = 10;

/// A position on the board. `row` and `col` both count from the top left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A player's place in the fixed turn order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// A single cell of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub card: CellCard,
    /// Who has a chip on this cell. Always `None` for wild cells.
    pub owner: Option<Seat>,
}

impl Cell {
    pub fn is_occupied(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_wild(&self) -> bool {
        self.card.is_wild()
    }

    /// Does this cell count towards a sequence of `seat`?
    pub fn counts_for(&self, seat: Seat) -> bool {
        self.is_wild() || self.owner == Some(seat)
    }
}

/// The result of asking where a card can be played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardTargets {
    Legal(Vec<Coord>),
    /// The card has no legal target and must be exchanged.
    Dead,
}

/// What a successful claim did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimOutcome {
    /// The cell now belongs to the player.
    Claimed,
    /// An opponent's chip was taken off the cell.
    Removed,
}

/// The 10x10 playing board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    /// The two positions of every card printed on the board.
    ///
    /// Derived from `cells`, which never change their card.
    positions: HashMap<Card, Vec<Coord>>,
}

impl Board {
    /// An empty board with the standard layout.
    pub fn new() -> Self {
        // The standard layout is covered by a test, so this cannot fail.
        match Self::from_layout(STANDARD_LAYOUT) {
            Ok(board) => board,
            Err(err) => unreachable!("standard layout is invalid: {}", err),
        }
    }

    /// Creates an empty board from a layout, checking that it is a valid Sequence board.
    pub fn from_layout(layout: [[CellCard; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, InvalidLayout> {
        let cells = layout.map(|row| row.map(|card| Cell { card, owner: None }));
        Self::from_cell_grid(cells)
    }

    /// Rebuilds a board from its cells, e.g. after receiving it over the wire.
    pub fn from_cells(rows: Vec<Vec<Cell>>) -> Result<Self, InvalidLayout> {
        let wrong_dimensions = InvalidLayout::WrongDimensions {
            rows: rows.len(),
            columns: rows.iter().map(Vec::len).max().unwrap_or(0),
        };
        let rows: Vec<[Cell; BOARD_SIZE]> = rows
            .into_iter()
            .map(|row| row.try_into())
            .collect::<Result<_, _>>()
            .map_err(|_| wrong_dimensions.clone())?;
        let cells: [[Cell; BOARD_SIZE]; BOARD_SIZE] =
            rows.try_into().map_err(|_| wrong_dimensions)?;
        Self::from_cell_grid(cells)
    }

    fn from_cell_grid(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, InvalidLayout> {
        let mut positions: HashMap<Card, Vec<Coord>> = HashMap::new();
        let mut wild_count = 0;
        for (row, cells_in_row) in cells.iter().enumerate() {
            for (col, cell) in cells_in_row.iter().enumerate() {
                let coord = Coord::new(row, col);
                match cell.card {
                    CellCard::Wild => {
                        if cell.owner.is_some() {
                            return Err(InvalidLayout::OwnedWildCell { coord });
                        }
                        wild_count += 1;
                    }
                    CellCard::Standard(card) if card.rank == Rank::Jack => {
                        return Err(InvalidLayout::JackOnBoard { card });
                    }
                    CellCard::Standard(card) => positions.entry(card).or_default().push(coord),
                }
            }
        }
        if wild_count != 4 {
            return Err(InvalidLayout::WildCount { count: wild_count });
        }
        for card in full_deck().into_iter().filter(|c| c.rank != Rank::Jack) {
            let count = positions.get(&card).map_or(0, Vec::len);
            if count != 2 {
                return Err(InvalidLayout::CardCount { card, count });
            }
        }
        Ok(Self { cells, positions })
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(coord.row).and_then(|row| row.get(coord.col))
    }

    /// All cells in row-major order, with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (Coord::new(row, col), cell))
        })
    }

    /// The two cells showing `card`. Empty for jacks.
    pub fn positions_of(&self, card: Card) -> &[Coord] {
        self.positions.get(&card).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Where could `seat` play `card` right now?
    ///
    /// - A one-eyed jack targets every cell owned by somebody else.
    /// - A two-eyed jack targets every free cell that is not wild.
    /// - Any other card targets its two printed cells, minus those that already
    ///   carry a chip (of `seat` or of anybody else).
    pub fn find_valid_cells(&self, card: Card, seat: Seat) -> CardTargets {
        let targets: Vec<Coord> = if card.is_one_eyed_jack() {
            self.cells()
                .filter(|(_, cell)| cell.owner.is_some_and(|owner| owner != seat))
                .map(|(coord, _)| coord)
                .collect()
        } else if card.is_two_eyed_jack() {
            self.cells()
                .filter(|(_, cell)| !cell.is_occupied() && !cell.is_wild())
                .map(|(coord, _)| coord)
                .collect()
        } else {
            self.positions_of(card)
                .iter()
                .copied()
                .filter(|&coord| {
                    let cell = &self.cells[coord.row][coord.col];
                    cell.owner != Some(seat) && !cell.is_occupied()
                })
                .collect()
        };
        if targets.is_empty() {
            CardTargets::Dead
        } else {
            CardTargets::Legal(targets)
        }
    }

    /// Checks whether `seat` may play `card` on `coord`, without changing the board.
    pub fn check_claim(&self, seat: Seat, card: Card, coord: Coord) -> Result<ClaimOutcome, IllegalClaim> {
        let cell = self.get(coord).ok_or(IllegalClaim::OutOfBounds { coord })?;
        if cell.is_wild() {
            return Err(IllegalClaim::WildCell { coord });
        }
        match cell.owner {
            Some(owner) if owner == seat => Err(IllegalClaim::AlreadyOwned { coord }),
            Some(_) if card.is_one_eyed_jack() => Ok(ClaimOutcome::Removed),
            Some(owner) => Err(IllegalClaim::OwnedByOpponent { coord, owner }),
            None if card.is_one_eyed_jack() => Err(IllegalClaim::NothingToRemove { coord }),
            None if card.is_two_eyed_jack() => Ok(ClaimOutcome::Claimed),
            None if cell.card == CellCard::Standard(card) => Ok(ClaimOutcome::Claimed),
            None => Err(IllegalClaim::CardMismatch {
                coord,
                cell_card: cell.card,
                card,
            }),
        }
    }

    /// Plays `card` for `seat` on `coord`.
    ///
    /// Either the cell is claimed, or (for a one-eyed jack) the opponent's chip
    /// is removed. An illegal claim leaves the board untouched.
    pub fn claim_cell(&mut self, seat: Seat, card: Card, coord: Coord) -> Result<ClaimOutcome, IllegalClaim> {
        let outcome = self.check_claim(seat, card, coord)?;
        let cell = &mut self.cells[coord.row][coord.col];
        cell.owner = match outcome {
            ClaimOutcome::Claimed => Some(seat),
            ClaimOutcome::Removed => None,
        };
        Ok(outcome)
    }

    #[cfg(test)]
    pub(crate) fn set_owner(&mut self, coord: Coord, owner: Option<Seat>) {
        self.cells[coord.row][coord.col].owner = owner;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = InvalidLayout;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_cells(rows)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.cells.iter().map(|row| row.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::ArbitraryPosition;
    use crate::card;

    const ALICE: Seat = Seat(0);
    const BOB: Seat = Seat(1);

    #[test]
    fn standard_layout_is_valid() {
        let board = Board::new();
        assert_eq!(board.cells().filter(|(_, cell)| cell.is_wild()).count(), 4);
        for corner in [(0, 0), (0, 9), (9, 0), (9, 9)] {
            assert!(board.get(Coord::new(corner.0, corner.1)).unwrap().is_wild());
        }
        assert!(board.positions_of(card!("J♦")).is_empty());
    }

    #[test]
    fn layout_with_missing_card_is_rejected() {
        let mut layout = STANDARD_LAYOUT;
        layout[0][1] = CellCard::Standard(card!("7♦"));
        assert!(matches!(
            Board::from_layout(layout),
            Err(InvalidLayout::CardCount { .. })
        ));
        let mut layout = STANDARD_LAYOUT;
        layout[0][1] = CellCard::Standard(card!("J♦"));
        assert_eq!(
            Board::from_layout(layout),
            Err(InvalidLayout::JackOnBoard { card: card!("J♦") })
        );
    }

    #[test]
    fn two_eyed_jack_claims_any_free_cell() {
        let mut board = Board::new();
        let target = Coord::new(0, 1);
        assert_eq!(board.claim_cell(ALICE, card!("J♦"), target), Ok(ClaimOutcome::Claimed));
        assert_eq!(board.get(target).unwrap().owner, Some(ALICE));
        match board.find_valid_cells(card!("J♣"), BOB) {
            CardTargets::Legal(targets) => {
                assert!(!targets.contains(&target));
                assert_eq!(targets.len(), 95);
            }
            CardTargets::Dead => panic!("two-eyed jack should have targets"),
        }
    }

    #[test]
    fn one_eyed_jack_removes_opponent_chip() {
        let mut board = Board::new();
        let target = Coord::new(0, 1);
        board.claim_cell(ALICE, card!("6♦"), target).unwrap();
        assert_eq!(
            board.find_valid_cells(card!("J♠"), BOB),
            CardTargets::Legal(vec![target])
        );
        assert_eq!(board.find_valid_cells(card!("J♠"), ALICE), CardTargets::Dead);
        assert_eq!(board.claim_cell(BOB, card!("J♥"), target), Ok(ClaimOutcome::Removed));
        assert_eq!(board.get(target).unwrap().owner, None);
    }

    #[test]
    fn illegal_claims_leave_board_untouched() {
        let mut board = Board::new();
        let six = Coord::new(0, 1);
        let corner = Coord::new(0, 0);
        assert_eq!(
            board.claim_cell(ALICE, card!("J♦"), corner),
            Err(IllegalClaim::WildCell { coord: corner })
        );
        assert_eq!(
            board.claim_cell(ALICE, card!("J♠"), six),
            Err(IllegalClaim::NothingToRemove { coord: six })
        );
        assert!(matches!(
            board.claim_cell(ALICE, card!("7♦"), six),
            Err(IllegalClaim::CardMismatch { .. })
        ));
        board.claim_cell(ALICE, card!("6♦"), six).unwrap();
        assert_eq!(
            board.claim_cell(ALICE, card!("J♠"), six),
            Err(IllegalClaim::AlreadyOwned { coord: six })
        );
        assert_eq!(
            board.claim_cell(BOB, card!("J♦"), six),
            Err(IllegalClaim::OwnedByOpponent { coord: six, owner: ALICE })
        );
        assert_eq!(
            board.claim_cell(BOB, card!("6♦"), Coord::new(10, 0)),
            Err(IllegalClaim::OutOfBounds { coord: Coord::new(10, 0) })
        );
        assert_eq!(board.get(six).unwrap().owner, Some(ALICE));
    }

    #[test]
    fn ordinary_card_is_dead_when_both_cells_taken() {
        let mut board = Board::new();
        let card = card!("6♦");
        let positions = board.positions_of(card).to_vec();
        assert_eq!(positions.len(), 2);
        board.claim_cell(ALICE, card, positions[0]).unwrap();
        assert_eq!(
            board.find_valid_cells(card, ALICE),
            CardTargets::Legal(vec![positions[1]])
        );
        board.claim_cell(BOB, card, positions[1]).unwrap();
        assert_eq!(board.find_valid_cells(card, ALICE), CardTargets::Dead);
        assert_eq!(board.find_valid_cells(card, BOB), CardTargets::Dead);
    }

    #[test]
    fn serializes_as_cell_grid() {
        let mut board = Board::new();
        board.claim_cell(BOB, card!("J♣"), Coord::new(4, 4)).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert!(Board::from_cells(vec![vec![]]).is_err());
    }

    quickcheck! {
        fn every_listed_target_can_be_claimed(position: ArbitraryPosition) -> bool {
            let ArbitraryPosition { board, seat, card } = position;
            match board.find_valid_cells(card, seat) {
                CardTargets::Legal(targets) => targets
                    .into_iter()
                    .all(|coord| board.clone().claim_cell(seat, card, coord).is_ok()),
                CardTargets::Dead => board
                    .cells()
                    .all(|(coord, _)| board.check_claim(seat, card, coord).is_err()),
            }
        }
    }
}
