use std::io::{BufRead, Write};

use sequence::{
    visualize_board, visualize_hand, Card, CardTargets, Coord, GameError, PlayerId, Strategy,
    TurnReport, DECK_SIZE,
};
use tracing::warn;

use crate::display::{DisplayEvent, DisplayHandle};
use crate::error::SessionError;
use crate::session::{MoveOutcome, SharedSession};

/// Asks a human on the terminal which card to play and where.
pub struct PromptStrategy<R, W> {
    input: R,
    output: W,
    buf: String,
}

impl<R: BufRead, W: Write> PromptStrategy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            buf: String::new(),
        }
    }

    /// Prints a board before the next prompt.
    pub fn show_board(&mut self, text: &str) {
        if let Err(err) = writeln!(self.output, "{}", text) {
            warn!(%err, "Could not write to the terminal");
        }
    }

    /// Asks until a number below `count` is entered. Falls back to 0 once input ends, or if there is nothing to choose.
    fn choose(&mut self, message: &str, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        loop {
            let prompted = write!(self.output, "{} [0-{}]: ", message, count.saturating_sub(1))
                .and_then(|()| self.output.flush());
            if let Err(err) = prompted {
                warn!(%err, "Could not write to the terminal");
                return 0;
            }
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => {
                    warn!("Input closed, picking the first option");
                    return 0;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "Could not read from the terminal");
                    return 0;
                }
            }
            match self.buf.trim().parse::<usize>() {
                Ok(choice) if choice < count => return choice,
                _ => {
                    let hint = writeln!(
                        self.output,
                        "Please enter a number between 0 and {}",
                        count.saturating_sub(1)
                    );
                    if let Err(err) = hint {
                        warn!(%err, "Could not write to the terminal");
                    }
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> Strategy for PromptStrategy<R, W> {
    fn select_card(&mut self, hand: &[Card]) -> usize {
        let message = format!("Your hand: {}\nPick a card", visualize_hand(hand));
        self.choose(&message, hand.len())
    }

    fn select_move(&mut self, card: Card, moves: &[Coord]) -> usize {
        let listed = moves
            .iter()
            .enumerate()
            .map(|(idx, coord)| format!("{}: {}", idx, coord))
            .collect::<Vec<_>>()
            .join("  ");
        let message = format!("{} can go to {}\nPick a cell", card, listed);
        self.choose(&message, moves.len())
    }
}

/// Plays the turn of the host's own seat, without a network round trip.
///
/// The session is only locked while a choice is applied, never while `strategy` decides.
/// Returns `None` if the turn had to be forfeited.
pub fn play_local_turn(
    session: &SharedSession,
    host_id: &PlayerId,
    strategy: &mut dyn Strategy,
    display: &DisplayHandle,
) -> Result<Option<TurnReport>, SessionError> {
    for _ in 0..DECK_SIZE {
        let view = session.lock().view_for(host_id)?;
        if view.hand.is_empty() {
            return Err(GameError::CardsExhausted.into());
        }
        let card = view.hand[strategy.select_card(&view.hand) % view.hand.len()];
        let coord = match view.board.find_valid_cells(card, view.seat) {
            // The exchange ignores the coordinate.
            CardTargets::Dead => Coord::new(0, 0),
            CardTargets::Legal(moves) => moves[strategy.select_move(card, &moves) % moves.len()],
        };

        let mut session = session.lock();
        let name = session.name_of(view.seat).to_string();
        match session.apply_move(host_id, card, coord) {
            Ok(MoveOutcome::Played(report)) => {
                display.push(DisplayEvent::Turn {
                    name,
                    report,
                    board: Box::new(session.board()?.clone()),
                });
                return Ok(Some(report));
            }
            Ok(MoveOutcome::Exchanged { discarded, .. }) => {
                display.push(DisplayEvent::Exchanged { name, discarded });
            }
            Err(err @ SessionError::Game(GameError::IllegalClaim { .. })) => {
                display.push(DisplayEvent::Message(err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }
    warn!("No playable card for the host, forfeiting the turn");
    session.lock().forfeit_waiting_turn()?;
    Ok(None)
}

/// Formats the board for the host's prompt.
pub fn board_prompt(session: &SharedSession) -> Result<String, SessionError> {
    Ok(visualize_board(session.lock().board()?))
}
