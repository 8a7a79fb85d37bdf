use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace};

use crate::{Card, CardTargets, Coord, Game, GameError, TurnReport, DECK_SIZE};

/// Decides which card to play and where, for a player that is not a human.
///
/// Both methods return an index into the given slice, which is never empty.
/// Out of range indices wrap around.
pub trait Strategy {
    fn select_card(&mut self, hand: &[Card]) -> usize;

    fn select_move(&mut self, card: Card, moves: &[Coord]) -> usize;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn select_card(&mut self, hand: &[Card]) -> usize {
        (**self).select_card(hand)
    }

    fn select_move(&mut self, card: Card, moves: &[Coord]) -> usize {
        (**self).select_move(card, moves)
    }
}

/// Always plays the first card on its first target.
#[derive(Clone, Copy, Debug, Default)]
pub struct FifoStrategy;

impl Strategy for FifoStrategy {
    fn select_card(&mut self, _hand: &[Card]) -> usize {
        0
    }

    fn select_move(&mut self, _card: Card, _moves: &[Coord]) -> usize {
        0
    }
}

/// Picks cards and targets uniformly at random.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Strategy for RandomStrategy {
    fn select_card(&mut self, hand: &[Card]) -> usize {
        self.rng.gen_range(0..hand.len())
    }

    fn select_move(&mut self, _card: Card, moves: &[Coord]) -> usize {
        self.rng.gen_range(0..moves.len())
    }
}

/// The CPU strategies that can be chosen by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    Fifo,
    Random,
}

impl StrategyKind {
    pub fn build(self, rng: StdRng) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Fifo => Box::new(FifoStrategy),
            StrategyKind::Random => Box::new(RandomStrategy::new(rng)),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Fifo => write!(f, "fifo"),
            StrategyKind::Random => write!(f, "random"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl std::fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown strategy '{}', expected 'fifo' or 'random'", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(StrategyKind::Fifo),
            "random" => Ok(StrategyKind::Random),
            _ => Err(UnknownStrategy(String::from(s))),
        }
    }
}

/// Plays one complete turn for the seat holding it, as decided by `strategy`.
///
/// Dead cards are exchanged along the way. Returns `None` if the player kept
/// drawing dead cards and the turn was forfeited instead.
pub fn play_strategy_turn<S: Strategy + ?Sized>(
    game: &mut Game,
    strategy: &mut S,
) -> Result<Option<TurnReport>, GameError> {
    let seat = game.current_seat();
    for _ in 0..DECK_SIZE {
        let hand = game.player(seat)?.hand.clone();
        let card = pick(&hand, strategy.select_card(&hand)).ok_or(GameError::CardsExhausted)?;
        match game.select_card(seat, card)? {
            CardTargets::Legal(moves) => {
                let coord = pick(&moves, strategy.select_move(card, &moves))
                    .ok_or(GameError::DeadCard { card })?;
                trace!(%seat, %card, %coord, "Strategy chose a move");
                return game.take_turn(seat, card, coord).map(Some);
            }
            CardTargets::Dead => {
                game.exchange_dead_card(seat, card)?;
            }
        }
    }
    debug!(%seat, "No playable card after exchanging, forfeiting");
    game.forfeit_turn(seat)?;
    Ok(None)
}

fn pick<T: Copy>(items: &[T], idx: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[idx % items.len()])
    }
}
