use quickcheck::{Arbitrary, Gen};

use crate::{Board, Card, Coord, Rank, Seat, Suit, BOARD_SIZE, RANKS, SUITS};

/// A board with some chips on it, a player and a card they might play.
#[derive(Clone, Debug)]
pub struct ArbitraryPosition {
    pub board: Board,
    pub seat: Seat,
    pub card: Card,
}

impl Arbitrary for ArbitraryPosition {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut board = Board::new();
        // Dense boards are interesting for sequences, sparse ones for claims
        let density = u8::arbitrary(g) % 4 + 1;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let coord = Coord::new(row, col);
                if board.get(coord).is_some_and(|cell| cell.is_wild()) {
                    continue;
                }
                if u8::arbitrary(g) % 8 < density {
                    board.set_owner(coord, Some(Seat(u8::arbitrary(g) % 3)));
                }
            }
        }
        ArbitraryPosition {
            board,
            seat: Seat(u8::arbitrary(g) % 3),
            card: Card::arbitrary(g),
        }
    }
}

impl Arbitrary for Suit {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&SUITS).unwrap()
    }
}

impl Arbitrary for Rank {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&RANKS).unwrap()
    }
}

impl Arbitrary for Card {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            rank: Rank::arbitrary(g),
            suit: Suit::arbitrary(g),
        }
    }
}
