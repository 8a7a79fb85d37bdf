use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sequence::{
    Board, Card, CardTargets, Coord, Game, GameError, LobbyEntry, LobbyView, PlayerId, PlayerView, Seat,
    SequenceCount, TurnReport,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;

/// The session shared between the request handlers and the game loop.
pub type SharedSession = Arc<Mutex<Session>>;

/// Roster sizes that can be played without teams.
const PLAYABLE: std::ops::RangeInclusive<usize> = 2..=3;
/// Roster sizes that would need teams.
const TEAM_SIZES: std::ops::RangeInclusive<usize> = 4..=12;
/// Nobody can join beyond the largest table that can be dealt.
pub const MAX_ROSTER: usize = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Lobby,
    Play,
    /// The game loop is waiting for the move of the current player.
    WaitTurn,
}

#[derive(Clone, Debug)]
struct RosterEntry {
    id: PlayerId,
    name: String,
}

/// What a move request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Played(TurnReport),
    /// The card was dead and has been replaced. The turn is not over.
    Exchanged { discarded: Card, drawn: Card },
}

/// The authoritative state of one hosted game, from lobby to winner.
pub struct Session {
    state: SessionState,
    roster: Vec<RosterEntry>,
    game: Option<Game>,
    seed: u64,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            state: SessionState::Init,
            roster: Vec::new(),
            game: None,
            seed,
        }
    }

    pub fn shared(seed: u64) -> SharedSession {
        Arc::new(Mutex::new(Self::new(seed)))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn open_lobby(&mut self) {
        if self.state == SessionState::Init {
            info!("Lobby open");
            self.state = SessionState::Lobby;
        }
    }

    /// Adds a player to the lobby and hands out their id.
    pub fn join(&mut self, name: String) -> Result<PlayerId, SessionError> {
        if self.state != SessionState::Lobby {
            return Err(SessionError::LobbyClosed);
        }
        if self.roster.len() >= MAX_ROSTER {
            return Err(SessionError::LobbyFull { max: MAX_ROSTER });
        }
        let id = PlayerId(Uuid::new_v4().to_string());
        info!(name, seat = self.roster.len(), "Player joined");
        self.roster.push(RosterEntry {
            id: id.clone(),
            name,
        });
        Ok(id)
    }

    /// Starts the game with everybody in the lobby, in joining order.
    ///
    /// On error the lobby stays open.
    pub fn close_lobby(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Lobby {
            return Err(SessionError::LobbyClosed);
        }
        let count = self.roster.len();
        if TEAM_SIZES.contains(&count) {
            return Err(SessionError::TeamsRequired { count });
        }
        if !PLAYABLE.contains(&count) {
            return Err(SessionError::InvalidLobby { count });
        }
        let names = self.roster.iter().map(|entry| entry.name.clone()).collect();
        let game = Game::new(names, StdRng::seed_from_u64(self.seed))?;
        info!(players = count, "Lobby closed, starting the game");
        self.game = Some(game);
        self.state = SessionState::Play;
        Ok(())
    }

    pub fn lobby_view(&self) -> LobbyView {
        LobbyView {
            open: self.state == SessionState::Lobby,
            players: self
                .roster
                .iter()
                .enumerate()
                .map(|(idx, entry)| LobbyEntry {
                    seat: Seat(idx as u8),
                    name: entry.name.clone(),
                })
                .collect(),
        }
    }

    pub fn seat_of(&self, player_id: &PlayerId) -> Result<Seat, SessionError> {
        self.roster
            .iter()
            .position(|entry| &entry.id == player_id)
            .map(|idx| Seat(idx as u8))
            .ok_or_else(|| SessionError::UnknownPlayer {
                player_id: player_id.to_string(),
            })
    }

    pub fn name_of(&self, seat: Seat) -> &str {
        self.roster
            .get(seat.index())
            .map(|entry| entry.name.as_str())
            .unwrap_or("?")
    }

    pub fn game(&self) -> Result<&Game, SessionError> {
        self.game.as_ref().ok_or(SessionError::NotPlaying)
    }

    fn game_mut(&mut self) -> Result<&mut Game, SessionError> {
        self.game.as_mut().ok_or(SessionError::NotPlaying)
    }

    pub fn board(&self) -> Result<&Board, SessionError> {
        self.game().map(Game::board)
    }

    /// The state as seen by one player. Contains no other player's hand.
    pub fn view_for(&self, player_id: &PlayerId) -> Result<PlayerView, SessionError> {
        let seat = self.seat_of(player_id)?;
        Ok(self.game()?.view_for(seat)?)
    }

    pub fn winner(&self) -> Option<&SequenceCount> {
        self.game.as_ref().and_then(Game::winner)
    }

    /// Marks the start of a turn and returns whose turn it is.
    pub fn begin_turn(&mut self) -> Result<Seat, SessionError> {
        let game = self.game()?;
        if game.is_over() {
            return Err(GameError::GameOver.into());
        }
        let seat = game.current_seat();
        self.state = SessionState::WaitTurn;
        debug!(%seat, "Waiting for move");
        Ok(seat)
    }

    pub fn is_waiting(&self) -> bool {
        self.state == SessionState::WaitTurn
    }

    /// Plays a card for the player with the given id.
    ///
    /// A dead card is exchanged instead, and `coord` is ignored. Any other
    /// rejected move leaves the session unchanged.
    pub fn apply_move(
        &mut self,
        player_id: &PlayerId,
        card: Card,
        coord: Coord,
    ) -> Result<MoveOutcome, SessionError> {
        if !matches!(self.state, SessionState::Play | SessionState::WaitTurn) {
            return Err(SessionError::NotPlaying);
        }
        let seat = self.seat_of(player_id)?;
        let game = self.game_mut()?;
        if game.is_over() {
            return Err(GameError::GameOver.into());
        }
        if game.current_seat() != seat {
            return Err(SessionError::NotYourTurn { seat });
        }
        match game.select_card(seat, card)? {
            CardTargets::Dead => {
                let drawn = game.exchange_dead_card(seat, card)?;
                Ok(MoveOutcome::Exchanged {
                    discarded: card,
                    drawn,
                })
            }
            CardTargets::Legal(_) => {
                let report = game.take_turn(seat, card, coord)?;
                self.state = SessionState::Play;
                Ok(MoveOutcome::Played(report))
            }
        }
    }

    /// Skips the turn of a player that did not move in time.
    ///
    /// Returns `None` if the move arrived in the meantime.
    pub fn forfeit_waiting_turn(&mut self) -> Result<Option<Seat>, SessionError> {
        if !self.is_waiting() {
            return Ok(None);
        }
        let game = self.game_mut()?;
        let seat = game.current_seat();
        game.forfeit_turn(seat)?;
        self.state = SessionState::Play;
        Ok(Some(seat))
    }
}

#[cfg(test)]
mod tests {
    use sequence::{card, ClaimOutcome};

    use super::*;

    fn lobby(names: &[&str]) -> (Session, Vec<PlayerId>) {
        let mut session = Session::new(5);
        session.open_lobby();
        let ids = names
            .iter()
            .map(|name| session.join(name.to_string()).unwrap())
            .collect();
        (session, ids)
    }

    /// A card from the hand of `seat` that has a legal target, and that target.
    fn playable(session: &Session, seat: Seat) -> (Card, Coord) {
        let game = session.game().unwrap();
        game.player(seat)
            .unwrap()
            .hand
            .iter()
            .find_map(|&card| match game.select_card(seat, card).unwrap() {
                CardTargets::Legal(targets) => Some((card, targets[0])),
                CardTargets::Dead => None,
            })
            .unwrap()
    }

    #[test]
    fn join_only_while_lobby_is_open() {
        let mut session = Session::new(1);
        assert_eq!(session.join("Alice".into()), Err(SessionError::LobbyClosed));
        session.open_lobby();
        let alice = session.join("Alice".into()).unwrap();
        let bob = session.join("Bob".into()).unwrap();
        assert_ne!(alice, bob);
        assert_eq!(session.lobby_view().players.len(), 2);
        session.close_lobby().unwrap();
        assert_eq!(session.join("Carol".into()), Err(SessionError::LobbyClosed));
    }

    #[test]
    fn lobby_close_checks_roster_size() {
        let (mut session, _) = lobby(&["Alice"]);
        assert_eq!(session.close_lobby(), Err(SessionError::InvalidLobby { count: 1 }));
        assert_eq!(session.state(), SessionState::Lobby);

        let (mut session, _) = lobby(&["a", "b", "c", "d"]);
        assert_eq!(session.close_lobby(), Err(SessionError::TeamsRequired { count: 4 }));

        let mut session = Session::new(1);
        session.open_lobby();
        assert_eq!(session.close_lobby(), Err(SessionError::InvalidLobby { count: 0 }));
    }

    #[test]
    fn lobby_is_capped_at_the_largest_table() {
        let names: Vec<String> = (0..MAX_ROSTER).map(|i| i.to_string()).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let (mut session, _) = lobby(&names);
        assert_eq!(
            session.join("one too many".into()),
            Err(SessionError::LobbyFull { max: MAX_ROSTER })
        );
        let seats: Vec<Seat> = session.lobby_view().players.iter().map(|p| p.seat).collect();
        assert_eq!(seats, (0..12).map(Seat).collect::<Vec<_>>());
        assert_eq!(
            session.close_lobby(),
            Err(SessionError::TeamsRequired { count: MAX_ROSTER })
        );
    }

    #[test]
    fn two_player_game_is_dealt() {
        let (mut session, ids) = lobby(&["Alice", "Bob"]);
        session.close_lobby().unwrap();
        let game = session.game().unwrap();
        assert_eq!(game.win_threshold(), 2);
        assert_eq!(game.draw_pile().len(), 90);
        let view = session.view_for(&ids[1]).unwrap();
        assert_eq!(view.hand.len(), 7);
        assert_eq!(view.seat, Seat(1));
    }

    #[test]
    fn only_the_current_player_may_move() {
        let (mut session, ids) = lobby(&["Alice", "Bob"]);
        assert_eq!(
            session.apply_move(&ids[0], card!("J♦"), Coord::new(0, 1)),
            Err(SessionError::NotPlaying)
        );
        session.close_lobby().unwrap();
        assert_eq!(session.begin_turn(), Ok(Seat(0)));

        let (card, coord) = playable(&session, Seat(1));
        assert_eq!(
            session.apply_move(&ids[1], card, coord),
            Err(SessionError::NotYourTurn { seat: Seat(1) })
        );
        let stranger = PlayerId(String::from("nobody"));
        assert!(matches!(
            session.apply_move(&stranger, card, coord),
            Err(SessionError::UnknownPlayer { .. })
        ));

        let (card, coord) = playable(&session, Seat(0));
        let outcome = session.apply_move(&ids[0], card, coord).unwrap();
        assert!(matches!(outcome, MoveOutcome::Played(report) if report.seat == Seat(0)));
        assert!(!session.is_waiting());
        assert_eq!(session.game().unwrap().current_seat(), Seat(1));
    }

    #[test]
    fn illegal_move_is_reported() {
        let (mut session, ids) = lobby(&["Alice", "Bob"]);
        session.close_lobby().unwrap();
        session.begin_turn().unwrap();
        let (card, _) = playable(&session, Seat(0));
        let corner = Coord::new(0, 0);
        assert!(matches!(
            session.apply_move(&ids[0], card, corner),
            Err(SessionError::Game(GameError::IllegalClaim { .. }))
        ));
        assert_eq!(session.game().unwrap().turn_count(), 0);
        assert!(session.is_waiting());
    }

    #[test]
    fn timed_out_turn_is_forfeited_once() {
        let (mut session, ids) = lobby(&["Alice", "Bob"]);
        session.close_lobby().unwrap();
        session.begin_turn().unwrap();
        assert_eq!(session.forfeit_waiting_turn(), Ok(Some(Seat(0))));
        assert_eq!(session.forfeit_waiting_turn(), Ok(None));

        session.begin_turn().unwrap();
        let (card, coord) = playable(&session, Seat(1));
        let outcome = session.apply_move(&ids[1], card, coord).unwrap();
        if let MoveOutcome::Played(report) = outcome {
            assert!(matches!(report.outcome, ClaimOutcome::Claimed | ClaimOutcome::Removed));
        }
        assert_eq!(session.forfeit_waiting_turn(), Ok(None));
        assert_eq!(session.game().unwrap().turn_count(), 1);
    }
}
