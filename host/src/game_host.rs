use std::time::Duration;

use sequence::{PlayerId, SequenceCount, Strategy};
use tracing::{info, warn};

use crate::config::HostConfig;
use crate::dispatch::Dispatcher;
use crate::display::{DisplayEvent, DisplayHandle};
use crate::error::SessionError;
use crate::local::play_local_turn;
use crate::session::{Session, SharedSession};
use crate::turn_gate::{turn_gate, TurnSignal, TurnWaiter, WaitOutcome};

/// Runs one game: owns the turn loop, and plays the host's own seat.
pub struct GameHost {
    session: SharedSession,
    signal: TurnSignal,
    waiter: TurnWaiter,
    display: DisplayHandle,
    host_id: PlayerId,
    turn_timeout: Option<Duration>,
}

impl GameHost {
    /// Opens the lobby with the host as its first player.
    pub fn new(config: &HostConfig, display: DisplayHandle) -> Result<Self, SessionError> {
        let session = Session::shared(config.seed);
        let host_id = {
            let mut session = session.lock();
            session.open_lobby();
            let host_id = session.join(config.name.clone())?;
            display.push(DisplayEvent::Lobby(session.lobby_view()));
            host_id
        };
        let (signal, waiter) = turn_gate();
        Ok(Self {
            session,
            signal,
            waiter,
            display,
            host_id,
            turn_timeout: config.turn_timeout,
        })
    }

    /// A request handler for the server, sharing this host's session.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.session.clone(),
            self.signal.clone(),
            self.display.clone(),
        )
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Tries to start the game. On error the lobby stays open and more players may join.
    pub fn close_lobby(&self) -> Result<(), SessionError> {
        let mut session = self.session.lock();
        let result = session.close_lobby();
        if let Err(err) = &result {
            warn!(%err, "Could not close the lobby");
        }
        result
    }

    /// Plays turns until somebody has won.
    pub fn play(&self, strategy: &mut dyn Strategy) -> Result<SequenceCount, SessionError> {
        let host_seat = self.session.lock().seat_of(&self.host_id)?;
        loop {
            let seat = {
                let mut session = self.session.lock();
                if let Some(winner) = session.winner().cloned() {
                    let name = session.name_of(winner.seat).to_string();
                    info!(winner = name, sequences = winner.count(), "Game over");
                    self.display.push(DisplayEvent::GameOver {
                        name,
                        sequences: winner.count(),
                    });
                    return Ok(winner);
                }
                self.waiter.clear();
                let seat = session.begin_turn()?;
                let game = session.game()?;
                info!(turn = game.turn_count(), %seat, player = session.name_of(seat), "Next turn");
                seat
            };

            if seat == host_seat {
                play_local_turn(&self.session, &self.host_id, strategy, &self.display)?;
                continue;
            }

            match self.waiter.wait(self.turn_timeout) {
                WaitOutcome::Released => {}
                WaitOutcome::TimedOut => self.forfeit_if_still_waiting(),
                // Cannot happen while `self.signal` is alive.
                WaitOutcome::Closed => return Err(SessionError::NotPlaying),
            }
        }
    }

    fn forfeit_if_still_waiting(&self) {
        let mut session = self.session.lock();
        match session.forfeit_waiting_turn() {
            Ok(Some(seat)) => {
                let name = session.name_of(seat).to_string();
                warn!(player = name, %seat, "Turn timed out");
                self.display.push(DisplayEvent::Forfeited { name, seat });
            }
            // The move came in right at the deadline.
            Ok(None) => self.waiter.clear(),
            Err(err) => warn!(%err, "Could not forfeit the turn"),
        }
    }
}
