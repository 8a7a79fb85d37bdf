use std::thread;
use std::time::Duration;

use sequence::{CardTargets, Coord, PlayerView, ReplyValue, SequenceCount, Strategy, DECK_SIZE};
use tracing::{debug, info, warn};

use crate::Client;

/// Plays a remote seat with a [`Strategy`]: joins, then polls until it is its turn.
pub struct Bot<S> {
    client: Client,
    strategy: S,
    poll_interval: Duration,
}

impl<S: Strategy> Bot<S> {
    pub fn new(client: Client, strategy: S, poll_interval: Duration) -> Self {
        Self {
            client,
            strategy,
            poll_interval,
        }
    }

    /// Joins under `name` and plays until the game has a winner.
    pub fn run(&mut self, name: &str) -> anyhow::Result<SequenceCount> {
        let player_id = self.client.join(name)?;
        info!(%player_id, "Joined the lobby");
        loop {
            match self.client.poll()? {
                ReplyValue::Game(view) => {
                    if let Some(winner) = view.winner {
                        info!(winner = %winner.seat, mine = winner.seat == view.seat, "Game over");
                        if let Err(err) = self.client.leave() {
                            debug!(%err, "Could not leave");
                        }
                        return Ok(winner);
                    }
                    if view.current_turn == view.seat {
                        self.play_turn(*view)?;
                        continue;
                    }
                }
                ReplyValue::Lobby(lobby) => debug!(players = lobby.players.len(), "Waiting in the lobby"),
                other => warn!(?other, "Unexpected reply to poll"),
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// Picks a card and a target on the polled board and sends the move.
    ///
    /// A dead card is sent anyway, the host exchanges it and the bot picks again.
    fn play_turn(&mut self, mut view: PlayerView) -> anyhow::Result<()> {
        for _ in 0..DECK_SIZE {
            if view.hand.is_empty() {
                anyhow::bail!("Empty hand");
            }
            let card = view.hand[self.strategy.select_card(&view.hand) % view.hand.len()];
            let coord = match view.board.find_valid_cells(card, view.seat) {
                CardTargets::Dead => Coord::new(0, 0),
                CardTargets::Legal(moves) => {
                    moves[self.strategy.select_move(card, &moves) % moves.len()]
                }
            };
            match self.client.play(card, coord) {
                Ok(ReplyValue::Exchanged {
                    discarded,
                    drawn,
                    view: new_view,
                }) => {
                    debug!(%discarded, %drawn, "Exchanged a dead card");
                    view = *new_view;
                }
                Ok(_) => {
                    debug!(%card, %coord, "Played");
                    return Ok(());
                }
                Err(err) => {
                    // e.g. the turn timed out in the meantime
                    warn!(%err, "Move rejected");
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
