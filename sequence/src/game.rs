use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    double_deck, find_winner, Board, Card, CardTargets, ClaimOutcome, Coord, GameError, Seat,
    SequenceCount, DECK_SIZE,
};

/// How many cards each player is dealt, by number of players.
const HAND_SIZES: [(usize, usize); 8] = [
    (2, 7),
    (3, 6),
    (4, 6),
    (6, 5),
    (8, 4),
    (9, 4),
    (10, 3),
    (12, 3),
];

/// The initial hand size for a game with `num_players` players, if such a game can be dealt.
pub fn hand_size(num_players: usize) -> Option<usize> {
    HAND_SIZES
        .iter()
        .find(|&&(players, _)| players == num_players)
        .map(|&(_, size)| size)
}

/// How many distinct sequences are needed to win.
pub fn win_threshold(num_players: usize) -> usize {
    if num_players == 2 {
        2
    } else {
        1
    }
}

/// A participant of a game, together with their hand.
#[derive(Clone, Debug)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    /// The order is only relevant for display.
    pub hand: Vec<Card>,
}

/// The colour a seat's chips are shown in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipColor {
    Red,
    Blue,
    Green,
}

impl ChipColor {
    pub fn for_seat(seat: Seat) -> Self {
        match seat.0 % 3 {
            0 => ChipColor::Red,
            1 => ChipColor::Blue,
            _ => ChipColor::Green,
        }
    }
}

/// What happened during a turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub seat: Seat,
    pub card: Card,
    pub coord: Coord,
    pub outcome: ClaimOutcome,
}

/// What the public knows about a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub seat: Seat,
    pub name: String,
    pub color: ChipColor,
    pub hand_size: usize,
}

/// The game as seen by one player: everything public, plus their own hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub hand: Vec<Card>,
    pub players: Vec<PublicPlayer>,
    pub board: Board,
    pub current_turn: Seat,
    pub turn_count: u32,
    pub draw_pile_size: usize,
    pub win_threshold: usize,
    pub winner: Option<SequenceCount>,
}

/// The state of one game of Sequence.
///
/// Players take turns in a fixed order. The engine does no I/O, it is driven by whoever
/// holds the turn (a local loop or the host's request handler).
#[derive(Clone, Debug)]
pub struct Game {
    players: Vec<Player>,
    board: Board,
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    current: usize,
    turn_count: u32,
    win_threshold: usize,
    winner: Option<SequenceCount>,
    rng: StdRng,
}

impl Game {
    /// Shuffles two decks and deals a new game, one card at a time, in seat order.
    pub fn new(names: Vec<String>, rng: StdRng) -> Result<Self, GameError> {
        Self::with_board(names, Board::new(), rng)
    }

    /// Like [`Game::new()`], but starts from the given board.
    pub fn with_board(names: Vec<String>, board: Board, mut rng: StdRng) -> Result<Self, GameError> {
        let num_players = names.len();
        let hand_size = hand_size(num_players)
            .ok_or(GameError::UnsupportedPlayerCount { count: num_players })?;
        let mut players: Vec<Player> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Player {
                seat: Seat(idx as u8),
                name,
                hand: Vec::with_capacity(hand_size),
            })
            .collect();
        let mut draw_pile = double_deck(&mut rng);
        for _ in 0..hand_size {
            for player in players.iter_mut() {
                let card = draw_pile.pop().ok_or(GameError::CardsExhausted)?;
                player.hand.push(card);
            }
        }
        debug!(num_players, hand_size, "Dealt a new game");
        Ok(Self {
            players,
            board,
            draw_pile,
            discard_pile: Vec::new(),
            current: 0,
            turn_count: 0,
            win_threshold: win_threshold(num_players),
            winner: None,
            rng,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> Result<&Player, GameError> {
        self.players
            .get(seat.index())
            .ok_or(GameError::UnknownSeat { seat })
    }

    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        self.players.iter().map(|p| p.seat)
    }

    /// Whose turn it is.
    pub fn current_seat(&self) -> Seat {
        self.players[self.current].seat
    }

    /// The number of turns played so far. Dead card exchanges and forfeited turns do not count.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn win_threshold(&self) -> usize {
        self.win_threshold
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    /// All cards in hands, the draw pile and the discard pile. Always [`DECK_SIZE`].
    pub fn card_count(&self) -> usize {
        self.players.iter().map(|p| p.hand.len()).sum::<usize>()
            + self.draw_pile.len()
            + self.discard_pile.len()
    }

    /// The winner and their sequences, once somebody has won.
    pub fn winner(&self) -> Option<&SequenceCount> {
        self.winner.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Where `seat` could play `card`. Fails if the card is not in their hand.
    ///
    /// This does not require `seat` to hold the turn, so players can plan ahead.
    pub fn select_card(&self, seat: Seat, card: Card) -> Result<CardTargets, GameError> {
        let player = self.player(seat)?;
        if !player.hand.contains(&card) {
            return Err(GameError::CardNotInHand { card });
        }
        Ok(self.board.find_valid_cells(card, seat))
    }

    /// Replaces a dead card by a fresh one. The turn stays with the same player.
    ///
    /// Returns the card that was drawn.
    pub fn exchange_dead_card(&mut self, seat: Seat, card: Card) -> Result<Card, GameError> {
        self.check_turn(seat)?;
        match self.select_card(seat, card)? {
            CardTargets::Dead => {}
            CardTargets::Legal(_) => return Err(GameError::NotDead { card }),
        }
        remove_card(&mut self.players[seat.index()].hand, card);
        self.discard_pile.push(card);
        let drawn = self.draw_card()?;
        self.players[seat.index()].hand.push(drawn);
        debug!(%seat, %card, %drawn, "Exchanged dead card");
        Ok(drawn)
    }

    /// Plays `card` from the hand of `seat` onto `coord` and passes the turn on.
    ///
    /// The move is validated completely before anything changes, so a
    /// rejected move leaves the game as it was.
    pub fn take_turn(&mut self, seat: Seat, card: Card, coord: Coord) -> Result<TurnReport, GameError> {
        self.check_turn(seat)?;
        if let CardTargets::Dead = self.select_card(seat, card)? {
            return Err(GameError::DeadCard { card });
        }
        self.board
            .check_claim(seat, card, coord)
            .map_err(|err| GameError::IllegalClaim { card, err })?;

        remove_card(&mut self.players[seat.index()].hand, card);
        let outcome = self
            .board
            .claim_cell(seat, card, coord)
            .map_err(|err| GameError::IllegalClaim { card, err })?;
        self.discard_pile.push(card);
        let drawn = self.draw_card()?;
        self.players[seat.index()].hand.push(drawn);
        self.turn_count += 1;
        self.winner = find_winner(&self.board, self.seats(), self.win_threshold);
        self.advance();

        Ok(TurnReport {
            seat,
            card,
            coord,
            outcome,
        })
    }

    /// Skips the turn of `seat` without playing a card.
    pub fn forfeit_turn(&mut self, seat: Seat) -> Result<(), GameError> {
        self.check_turn(seat)?;
        debug!(%seat, "Turn forfeited");
        self.advance();
        Ok(())
    }

    /// Draws the top card. An empty draw pile is replaced by the shuffled discard pile first.
    pub fn draw_card(&mut self) -> Result<Card, GameError> {
        if self.draw_pile.is_empty() {
            debug!(cards = self.discard_pile.len(), "Reshuffling the discard pile");
            self.draw_pile = std::mem::take(&mut self.discard_pile);
            self.draw_pile.shuffle(&mut self.rng);
        }
        let card = self.draw_pile.pop().ok_or(GameError::CardsExhausted)?;
        debug_assert_eq!(self.card_count() + 1, DECK_SIZE);
        Ok(card)
    }

    /// The game from the point of view of `seat`.
    pub fn view_for(&self, seat: Seat) -> Result<PlayerView, GameError> {
        let player = self.player(seat)?;
        Ok(PlayerView {
            seat,
            hand: player.hand.clone(),
            players: self
                .players
                .iter()
                .map(|p| PublicPlayer {
                    seat: p.seat,
                    name: p.name.clone(),
                    color: ChipColor::for_seat(p.seat),
                    hand_size: p.hand.len(),
                })
                .collect(),
            board: self.board.clone(),
            current_turn: self.current_seat(),
            turn_count: self.turn_count,
            draw_pile_size: self.draw_pile.len(),
            win_threshold: self.win_threshold,
            winner: self.winner.clone(),
        })
    }

    fn check_turn(&self, seat: Seat) -> Result<(), GameError> {
        self.player(seat)?;
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let current = self.current_seat();
        if seat != current {
            return Err(GameError::NotYourTurn { seat, current });
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.current = (self.current + 1) % self.players.len();
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn hand_mut(&mut self, seat: Seat) -> &mut Vec<Card> {
        &mut self.players[seat.index()].hand
    }
}

/// Removes one copy of `card`. Two copies of each card are in the game.
fn remove_card(hand: &mut Vec<Card>, card: Card) {
    if let Some(idx) = hand.iter().position(|&c| c == card) {
        hand.remove(idx);
    }
}
