use std::io::Write;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use sequence::{visualize_board, Board, Card, ClaimOutcome, LobbyView, Seat, TurnReport};
use tracing::debug;

/// How many updates may be pending before new ones are dropped.
pub const DISPLAY_QUEUE_SIZE: usize = 32;

/// Something the host's terminal should show.
#[derive(Clone, Debug)]
pub enum DisplayEvent {
    Lobby(LobbyView),
    Turn {
        name: String,
        report: TurnReport,
        board: Box<Board>,
    },
    Exchanged {
        name: String,
        discarded: Card,
    },
    Forfeited {
        name: String,
        seat: Seat,
    },
    Message(String),
    GameOver {
        name: String,
        sequences: usize,
    },
}

/// Pushes events onto the bounded display queue without ever blocking.
#[derive(Clone, Debug)]
pub struct DisplayHandle {
    tx: Option<SyncSender<DisplayEvent>>,
}

impl DisplayHandle {
    /// A handle that shows nothing, for headless hosts and tests.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn push(&self, event: DisplayEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!("Display queue full, dropping update"),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Starts the display thread, which renders events to `out` until every handle is dropped.
pub fn spawn_display<W: Write + Send + 'static>(out: W) -> (DisplayHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::sync_channel(DISPLAY_QUEUE_SIZE);
    let handle = thread::spawn(move || run_display(rx, out));
    (DisplayHandle { tx: Some(tx) }, handle)
}

fn run_display<W: Write>(rx: Receiver<DisplayEvent>, mut out: W) {
    for event in rx {
        let text = render(&event);
        if writeln!(out, "{}", text).and_then(|()| out.flush()).is_err() {
            break;
        }
    }
}

pub fn render(event: &DisplayEvent) -> String {
    match event {
        DisplayEvent::Lobby(lobby) => {
            let mut text = String::from("Lobby:");
            for entry in &lobby.players {
                text += &format!("\n  {} {}", entry.seat, entry.name);
            }
            if lobby.open {
                text += "\n>> Press enter to close the lobby and begin the game";
            }
            text
        }
        DisplayEvent::Turn {
            name,
            report,
            board,
        } => {
            let verb = match report.outcome {
                ClaimOutcome::Claimed => "claimed",
                ClaimOutcome::Removed => "cleared",
            };
            format!(
                "{}\n{} played {} and {} {}",
                visualize_board(board),
                name,
                report.card,
                verb,
                report.coord
            )
        }
        DisplayEvent::Exchanged { name, discarded } => {
            format!("{} exchanged the dead card {}", name, discarded)
        }
        DisplayEvent::Forfeited { name, seat } => {
            format!("{} ({}) did not move in time and lost the turn", name, seat)
        }
        DisplayEvent::Message(message) => message.clone(),
        DisplayEvent::GameOver { name, sequences } => {
            format!("Winner: {} with {} sequences", name, sequences)
        }
    }
}
