use crate::{Card, CellCard, Rank, Suit};

use Rank::*;
use Suit::*;

const W: CellCard = CellCard::Wild;

const fn c(rank: Rank, suit: Suit) -> CellCard {
    CellCard::Standard(Card { suit, rank })
}

/// The printed board of the commercial game.
///
/// Every card except the jacks appears exactly twice, and the four corners are wild.
pub const STANDARD_LAYOUT: [[CellCard; 10]; 10] = [
    [
        W, c(Six, Diamond), c(Seven, Diamond), c(Eight, Diamond), c(Nine, Diamond),
        c(Ten, Diamond), c(Queen, Diamond), c(King, Diamond), c(Ace, Diamond), W,
    ],
    [
        c(Five, Diamond), c(Three, Heart), c(Two, Heart), c(Two, Spade), c(Three, Spade),
        c(Four, Spade), c(Five, Spade), c(Six, Spade), c(Seven, Spade), c(Ace, Club),
    ],
    [
        c(Four, Diamond), c(Four, Heart), c(King, Diamond), c(Ace, Diamond), c(Ace, Club),
        c(King, Club), c(Queen, Club), c(Ten, Club), c(Eight, Spade), c(King, Club),
    ],
    [
        c(Three, Diamond), c(Five, Heart), c(Queen, Diamond), c(Queen, Heart), c(Ten, Heart),
        c(Nine, Heart), c(Eight, Heart), c(Nine, Club), c(Nine, Spade), c(Queen, Club),
    ],
    [
        c(Two, Diamond), c(Six, Heart), c(Ten, Diamond), c(King, Heart), c(Three, Heart),
        c(Two, Heart), c(Seven, Heart), c(Eight, Club), c(Ten, Spade), c(Ten, Club),
    ],
    [
        c(Ace, Spade), c(Seven, Heart), c(Nine, Diamond), c(Ace, Heart), c(Four, Heart),
        c(Five, Heart), c(Six, Heart), c(Seven, Club), c(Queen, Spade), c(Nine, Club),
    ],
    [
        c(King, Spade), c(Eight, Heart), c(Eight, Diamond), c(Two, Club), c(Three, Club),
        c(Four, Club), c(Five, Club), c(Six, Club), c(King, Spade), c(Eight, Club),
    ],
    [
        c(Queen, Spade), c(Nine, Heart), c(Seven, Diamond), c(Six, Diamond), c(Five, Diamond),
        c(Four, Diamond), c(Three, Diamond), c(Two, Diamond), c(Ace, Spade), c(Seven, Club),
    ],
    [
        c(Ten, Spade), c(Ten, Heart), c(Queen, Heart), c(King, Heart), c(Ace, Heart),
        c(Two, Club), c(Three, Club), c(Four, Club), c(Five, Club), c(Six, Club),
    ],
    [
        W, c(Nine, Spade), c(Eight, Spade), c(Seven, Spade), c(Six, Spade),
        c(Five, Spade), c(Four, Spade), c(Three, Spade), c(Two, Spade), W,
    ],
];
