use sequence::{Action, Card, Coord, PlayerId, Reply, ReplyValue, Request, PROTOCOL_VERSION};
use tracing::{debug, warn};

use crate::display::{DisplayEvent, DisplayHandle};
use crate::error::SessionError;
use crate::session::{MoveOutcome, Session, SharedSession};
use crate::turn_gate::TurnSignal;

/// Turns requests into replies. This is the only place where remote players touch the session.
///
/// Every error is converted to a reply, so a bad request never takes the host down.
#[derive(Clone)]
pub struct Dispatcher {
    session: SharedSession,
    signal: TurnSignal,
    display: DisplayHandle,
}

impl Dispatcher {
    pub fn new(session: SharedSession, signal: TurnSignal, display: DisplayHandle) -> Self {
        Self {
            session,
            signal,
            display,
        }
    }

    /// Handles one line of the wire protocol.
    pub fn handle_line(&self, line: &str) -> Reply {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(err) => {
                warn!(%err, "Could not parse request");
                Reply::unsupported(format!("Malformed request: {}", err))
            }
        }
    }

    pub fn handle(&self, request: Request) -> Reply {
        if request.version != PROTOCOL_VERSION {
            warn!(version = request.version, "Unsupported protocol version");
            return Reply::unsupported(format!(
                "Protocol version {} is not supported, expected {}",
                request.version, PROTOCOL_VERSION
            ));
        }
        debug!(action = ?request.action, player_id = ?request.player_id, "Handling request");
        match self.handle_action(request.player_id, request.action) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, "Rejected request");
                Reply::err(err.to_string())
            }
        }
    }

    fn handle_action(
        &self,
        player_id: Option<PlayerId>,
        action: Action,
    ) -> Result<Reply, SessionError> {
        let mut session = self.session.lock();
        match action {
            Action::Join { name } => {
                let player_id = session.join(name)?;
                self.display.push(DisplayEvent::Lobby(session.lobby_view()));
                Ok(Reply::ack(ReplyValue::Joined { player_id }))
            }
            Action::Move { card, coord } => {
                let player_id = player_id.ok_or(SessionError::MissingPlayerId)?;
                self.handle_move(&mut session, &player_id, card, coord)
            }
            Action::Poll => poll(&session, player_id.as_ref()),
            Action::Leave => Ok(Reply::okay()),
        }
    }

    fn handle_move(
        &self,
        session: &mut Session,
        player_id: &PlayerId,
        card: Card,
        coord: Coord,
    ) -> Result<Reply, SessionError> {
        let outcome = session.apply_move(player_id, card, coord)?;
        let view = Box::new(session.view_for(player_id)?);
        let name = session.name_of(view.seat).to_string();
        match outcome {
            MoveOutcome::Played(report) => {
                self.display.push(DisplayEvent::Turn {
                    name,
                    report,
                    board: Box::new(view.board.clone()),
                });
                self.signal.release();
                Ok(Reply::ack(ReplyValue::Game(view)))
            }
            MoveOutcome::Exchanged { discarded, drawn } => {
                self.display.push(DisplayEvent::Exchanged { name, discarded });
                Ok(Reply::ack(ReplyValue::Exchanged {
                    discarded,
                    drawn,
                    view,
                }))
            }
        }
    }
}

/// The lobby roster before the game, the player's own view afterwards.
fn poll(session: &Session, player_id: Option<&PlayerId>) -> Result<Reply, SessionError> {
    if let Some(player_id) = player_id {
        session.seat_of(player_id)?;
    }
    if session.game().is_err() {
        return Ok(Reply::ack(ReplyValue::Lobby(session.lobby_view())));
    }
    let player_id = player_id.ok_or(SessionError::MissingPlayerId)?;
    Ok(Reply::ack(ReplyValue::Game(Box::new(
        session.view_for(player_id)?,
    ))))
}

#[cfg(test)]
mod tests {
    use sequence::{card, CardTargets, Seat, Status};

    use super::*;
    use crate::turn_gate::{turn_gate, TurnWaiter, WaitOutcome};

    fn dispatcher() -> (Dispatcher, TurnWaiter) {
        let session = Session::shared(3);
        session.lock().open_lobby();
        let (signal, waiter) = turn_gate();
        (
            Dispatcher::new(session, signal, DisplayHandle::disabled()),
            waiter,
        )
    }

    fn join(dispatcher: &Dispatcher, name: &str) -> PlayerId {
        let reply = dispatcher.handle(Request::new(None, Action::Join { name: name.into() }));
        match reply.value {
            Some(ReplyValue::Joined { player_id }) => player_id,
            other => panic!("unexpected join reply {:?}", other),
        }
    }

    fn poll_view(dispatcher: &Dispatcher, id: &PlayerId) -> Box<sequence::PlayerView> {
        match dispatcher.handle(Request::new(Some(id.clone()), Action::Poll)).value {
            Some(ReplyValue::Game(view)) => view,
            other => panic!("unexpected poll reply {:?}", other),
        }
    }

    #[test]
    fn malformed_and_outdated_requests_are_unsupported() {
        let (dispatcher, _) = dispatcher();
        assert_eq!(dispatcher.handle_line("not json").status, Status::Unsupported);
        let old = r#"{"version":0,"action":{"kind":"POLL"}}"#;
        assert_eq!(dispatcher.handle_line(old).status, Status::Unsupported);
    }

    #[test]
    fn lobby_poll_shows_names_only() {
        let (dispatcher, _) = dispatcher();
        let alice = join(&dispatcher, "Alice");
        join(&dispatcher, "Bob");
        let reply = dispatcher.handle(Request::new(Some(alice), Action::Poll));
        assert_eq!(reply.status, Status::Ack);
        match reply.value {
            Some(ReplyValue::Lobby(lobby)) => {
                assert!(lobby.open);
                let names: Vec<&str> = lobby.players.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, ["Alice", "Bob"]);
            }
            other => panic!("unexpected poll reply {:?}", other),
        }
        let stranger = Request::new(Some(PlayerId("x".into())), Action::Poll);
        assert_eq!(dispatcher.handle(stranger).status, Status::Err);
    }

    #[test]
    fn join_after_close_is_an_error() {
        let (dispatcher, _) = dispatcher();
        join(&dispatcher, "Alice");
        join(&dispatcher, "Bob");
        dispatcher.session.lock().close_lobby().unwrap();
        let reply = dispatcher.handle(Request::new(None, Action::Join { name: "Carol".into() }));
        assert_eq!(reply.status, Status::Err);
        assert_eq!(
            reply.value,
            Some(ReplyValue::Error {
                message: String::from("The lobby is not open")
            })
        );
    }

    #[test]
    fn poll_never_reveals_other_hands() {
        let (dispatcher, _) = dispatcher();
        let alice = join(&dispatcher, "Alice");
        let bob = join(&dispatcher, "Bob");
        dispatcher.session.lock().close_lobby().unwrap();
        let view = poll_view(&dispatcher, &bob);
        let session = dispatcher.session.lock();
        let game = session.game().unwrap();
        assert_eq!(view.hand, game.player(Seat(1)).unwrap().hand);
        assert_eq!(session.seat_of(&alice), Ok(Seat(0)));
        let json = serde_json::to_string(&view).unwrap();
        // Only hand sizes of the others are listed.
        assert_eq!(json.matches("\"hand\":").count(), 1);
        assert_eq!(view.players[0].hand_size, 7);
    }

    #[test]
    fn valid_move_releases_the_gate() {
        let (dispatcher, waiter) = dispatcher();
        let alice = join(&dispatcher, "Alice");
        let bob = join(&dispatcher, "Bob");
        dispatcher.session.lock().close_lobby().unwrap();
        dispatcher.session.lock().begin_turn().unwrap();

        let bob_move = Request::new(
            Some(bob),
            Action::Move {
                card: card!("J♦"),
                coord: Coord::new(0, 1),
            },
        );
        assert_eq!(dispatcher.handle(bob_move).status, Status::Err);
        let missing_id = Request::new(
            None,
            Action::Move {
                card: card!("J♦"),
                coord: Coord::new(0, 1),
            },
        );
        assert_eq!(dispatcher.handle(missing_id).status, Status::Err);

        let view = poll_view(&dispatcher, &alice);
        let (card, coord) = view
            .hand
            .iter()
            .find_map(|&card| match view.board.find_valid_cells(card, view.seat) {
                CardTargets::Legal(targets) => Some((card, targets[0])),
                CardTargets::Dead => None,
            })
            .unwrap();
        let reply = dispatcher.handle(Request::new(Some(alice), Action::Move { card, coord }));
        assert_eq!(reply.status, Status::Ack);
        assert!(matches!(reply.value, Some(ReplyValue::Game(view)) if view.current_turn == Seat(1)));
        assert_eq!(waiter.wait(Some(std::time::Duration::from_secs(1))), WaitOutcome::Released);
    }

    /// Plays first legal moves until the current player holds a dead card.
    ///
    /// Returns the mover's id and the dead card, with the session waiting for that mover.
    fn advance_to_dead_card(session: &SharedSession, ids: &[PlayerId]) -> Option<(PlayerId, Card)> {
        for _ in 0..200 {
            let mut session = session.lock();
            let seat = session.begin_turn().ok()?;
            let game = session.game().ok()?;
            let mut playable = None;
            for &card in &game.player(seat).ok()?.hand {
                match game.select_card(seat, card).ok()? {
                    CardTargets::Dead => return Some((ids[seat.index()].clone(), card)),
                    CardTargets::Legal(targets) if playable.is_none() => {
                        playable = Some((card, targets[0]));
                    }
                    CardTargets::Legal(_) => {}
                }
            }
            let (card, coord) = playable?;
            session.apply_move(&ids[seat.index()], card, coord).ok()?;
        }
        None
    }

    #[test]
    fn dead_card_move_is_exchanged_and_keeps_the_turn() {
        let mut exchanged = 0;
        for seed in 0..20 {
            let session = Session::shared(seed);
            session.lock().open_lobby();
            let (signal, waiter) = turn_gate();
            let dispatcher = Dispatcher::new(session.clone(), signal, DisplayHandle::disabled());
            let ids = [join(&dispatcher, "Alice"), join(&dispatcher, "Bob")];
            session.lock().close_lobby().unwrap();

            let Some((mover, card)) = advance_to_dead_card(&session, &ids) else {
                continue;
            };
            waiter.clear();
            let (seat, turns) = {
                let session = session.lock();
                let game = session.game().unwrap();
                (game.current_seat(), game.turn_count())
            };

            let reply = dispatcher.handle(Request::new(
                Some(mover),
                Action::Move {
                    card,
                    coord: Coord::new(0, 0),
                },
            ));
            assert_eq!(reply.status, Status::Ack);
            match reply.value {
                Some(ReplyValue::Exchanged {
                    discarded, view, ..
                }) => {
                    assert_eq!(discarded, card);
                    assert_eq!(view.current_turn, seat);
                    assert_eq!(view.turn_count, turns);
                }
                other => panic!("unexpected move reply {:?}", other),
            }

            let session = session.lock();
            let game = session.game().unwrap();
            assert_eq!(game.current_seat(), seat);
            assert_eq!(game.turn_count(), turns);
            assert_eq!(game.card_count(), sequence::DECK_SIZE);
            assert!(session.is_waiting());
            assert_eq!(
                waiter.wait(Some(std::time::Duration::from_millis(10))),
                WaitOutcome::TimedOut
            );
            exchanged += 1;
        }
        assert!(exchanged > 0);
    }

    #[test]
    fn leave_is_acknowledged() {
        let (dispatcher, _) = dispatcher();
        let reply = dispatcher.handle(Request::new(None, Action::Leave));
        assert_eq!(reply, Reply::okay());
    }
}
