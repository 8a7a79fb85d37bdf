use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of cards in the draw pile at the start of a game: two standard decks, no jokers.
pub const DECK_SIZE: usize = 104;

/// A playing card from a standard 52-card deck.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

/// The suit of a [card](Card).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spade,
    #[serde(rename = "♦")]
    Diamond,
    #[serde(rename = "♥")]
    Heart,
    #[serde(rename = "♣")]
    Club,
}

/// The rank of a [card](Card).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

pub const SUITS: [Suit; 4] = [Suit::Spade, Suit::Diamond, Suit::Heart, Suit::Club];

pub const RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

impl Suit {
    /// Spades and hearts are drawn in profile, so their jacks only show one eye.
    pub fn is_one_eyed(self) -> bool {
        matches!(self, Suit::Spade | Suit::Heart)
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Diamond => '♦',
            Suit::Heart => '♥',
            Suit::Club => '♣',
        }
    }
}

impl Rank {
    /// The single character used in card codes, `T` for ten.
    pub fn code(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

impl Card {
    /// A jack that removes an opponent's chip from the board.
    pub fn is_one_eyed_jack(&self) -> bool {
        self.rank == Rank::Jack && self.suit.is_one_eyed()
    }

    /// A jack that can be placed on any free cell.
    pub fn is_two_eyed_jack(&self) -> bool {
        self.rank == Rank::Jack && !self.suit.is_one_eyed()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.symbol())
    }
}

/// What a board cell shows: a card value, or one of the four wild corners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "card", rename_all = "lowercase")]
pub enum CellCard {
    Standard(Card),
    Wild,
}

impl CellCard {
    pub fn is_wild(&self) -> bool {
        matches!(self, CellCard::Wild)
    }
}

impl std::fmt::Display for CellCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellCard::Standard(card) => write!(f, "{}", card),
            CellCard::Wild => write!(f, "WW"),
        }
    }
}

/// The 52 distinct cards, ordered by suit then rank.
pub fn full_deck() -> Vec<Card> {
    SUITS
        .iter()
        .flat_map(|&suit| RANKS.iter().map(move |&rank| Card { suit, rank }))
        .collect()
}

/// Two full decks, shuffled. Cards are drawn with `pop()`.
pub fn double_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = full_deck();
    deck.extend(full_deck());
    deck.shuffle(rng);
    deck
}

/// The error type for the [`FromStr`] instance of [`Card`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardFromStrErr {
    LessThanTwoChars,
    MoreThanTwoChars,
    InvalidRank,
    InvalidSuit,
}

impl std::error::Error for CardFromStrErr {}

impl std::fmt::Display for CardFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardFromStrErr::LessThanTwoChars => write!(f, "Card code must have two characters"),
            CardFromStrErr::MoreThanTwoChars => write!(f, "Card code has more than two characters"),
            CardFromStrErr::InvalidRank => write!(f, "Unknown rank, expected one of A23456789TJQK"),
            CardFromStrErr::InvalidSuit => write!(f, "Unknown suit, expected one of ♠♦♥♣ or SDHC"),
        }
    }
}

impl FromStr for Card {
    type Err = CardFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let rank_char = chars.next().ok_or(CardFromStrErr::LessThanTwoChars)?;
        let suit_char = chars.next().ok_or(CardFromStrErr::LessThanTwoChars)?;
        if chars.next().is_some() {
            return Err(CardFromStrErr::MoreThanTwoChars);
        }
        let rank = RANKS
            .into_iter()
            .find(|rank| rank.code() == rank_char.to_ascii_uppercase())
            .ok_or(CardFromStrErr::InvalidRank)?;
        let suit = match suit_char {
            '♠' | 'S' | 's' => Suit::Spade,
            '♦' | 'D' | 'd' => Suit::Diamond,
            '♥' | 'H' | 'h' => Suit::Heart,
            '♣' | 'C' | 'c' => Suit::Club,
            _ => return Err(CardFromStrErr::InvalidSuit),
        };
        Ok(Card { rank, suit })
    }
}

/// Shorthand for creating cards from a two-character string.
///
/// The first character is the [rank](Rank) (note: 10 is `T`), the second is
/// the [suit](Suit), either as a unicode character (♠, ♦, ♥, or ♣) or as one
/// of the letters `S`, `D`, `H`, `C`.
///
/// ```
/// # use sequence::{card, Card, Rank, Suit};
/// assert_eq!(
///     card!("T♥"),
///     Card { rank: Rank::Ten, suit: Suit::Heart }
/// );
/// assert_eq!(card!("JS"), card!("J♠"));
/// ```
#[macro_export]
macro_rules! card {
    ($rs:literal) => {
        <$crate::Card as std::str::FromStr>::from_str($rs)
            .expect("Invalid card code given to card! macro")
    };
}
#[allow(unused_imports)]
pub(crate) use card;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn jack_classification() {
        assert!(card!("J♠").is_one_eyed_jack());
        assert!(card!("J♥").is_one_eyed_jack());
        assert!(card!("J♦").is_two_eyed_jack());
        assert!(card!("J♣").is_two_eyed_jack());
        assert!(!card!("J♦").is_one_eyed_jack());
        assert!(!card!("Q♠").is_one_eyed_jack());
        assert!(!card!("Q♦").is_two_eyed_jack());
    }

    #[test]
    fn full_deck_is_distinct() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        assert_eq!(deck.iter().collect::<HashSet<_>>().len(), 52);
    }

    #[test]
    fn double_deck_has_each_card_twice() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = double_deck(&mut rng);
        assert_eq!(deck.len(), DECK_SIZE);
        for card in full_deck() {
            assert_eq!(deck.iter().filter(|&&c| c == card).count(), 2, "{}", card);
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!("A".parse::<Card>(), Err(CardFromStrErr::LessThanTwoChars));
        assert_eq!("A♠♠".parse::<Card>(), Err(CardFromStrErr::MoreThanTwoChars));
        assert_eq!("1♠".parse::<Card>(), Err(CardFromStrErr::InvalidRank));
        assert_eq!("AX".parse::<Card>(), Err(CardFromStrErr::InvalidSuit));
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for card in full_deck() {
            assert_eq!(card.to_string().parse::<Card>(), Ok(card));
        }
    }

    #[test]
    fn wild_serializes_with_tag() {
        let json = serde_json::to_string(&CellCard::Wild).unwrap();
        assert_eq!(json, r#"{"type":"wild"}"#);
        let back: CellCard = serde_json::from_str(&json).unwrap();
        assert!(back.is_wild());
    }
}
