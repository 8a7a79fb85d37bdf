use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use host::{DisplayHandle, GameHost, HostConfig, HostStrategy, Server};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sequence::{
    card, Action, Coord, FifoStrategy, RandomStrategy, ReplyValue, Seat, Status, StrategyKind,
};
use sequence_client::{Bot, Client};

fn config(address: &Path, timeout: Option<Duration>) -> HostConfig {
    HostConfig {
        address: address.to_path_buf(),
        name: String::from("Host"),
        seed: 23,
        turn_timeout: timeout,
        host_strategy: HostStrategy::Cpu(StrategyKind::Fifo),
    }
}

/// Starts a host with a running server. The lobby is open.
fn start_host(dir: &tempfile::TempDir, timeout: Option<Duration>) -> (GameHost, PathBuf) {
    let address = dir.path().join("sequence.sock");
    let host = GameHost::new(&config(&address, timeout), DisplayHandle::disabled()).unwrap();
    let server = Server::bind(&address).unwrap();
    let dispatcher = host.dispatcher();
    thread::spawn(move || server.serve(dispatcher));
    (host, address)
}

#[test]
fn rejected_requests_get_error_replies() {
    let dir = tempfile::tempdir().unwrap();
    let (host, address) = start_host(&dir, None);

    let mut alice = Client::connect(&address).unwrap();
    alice.join("Alice").unwrap();
    match alice.poll().unwrap() {
        ReplyValue::Lobby(lobby) => assert_eq!(lobby.players.len(), 2),
        other => panic!("unexpected reply {:?}", other),
    }
    host.close_lobby().unwrap();

    let mut late = Client::connect(&address).unwrap();
    assert!(late.join("Bob").is_err());

    // The host holds the first turn.
    let reply = alice
        .request(Action::Move {
            card: card!("J♦"),
            coord: Coord::new(0, 1),
        })
        .unwrap();
    assert_eq!(reply.status, Status::Err);

    let reply = alice.send_line(r#"{"version":2,"action":{"kind":"POLL"}}"#).unwrap();
    assert_eq!(reply.status, Status::Unsupported);
    let reply = alice.send_line("{").unwrap();
    assert_eq!(reply.status, Status::Unsupported);

    // The connection survives all of the above.
    match alice.poll().unwrap() {
        ReplyValue::Game(view) => {
            assert_eq!(view.seat, Seat(1));
            assert_eq!(view.current_turn, Seat(0));
            assert_eq!(view.hand.len(), 7);
            assert_eq!(view.draw_pile_size, 90);
        }
        other => panic!("unexpected reply {:?}", other),
    }
}

#[test]
fn remote_bot_plays_a_full_game() {
    let dir = tempfile::tempdir().unwrap();
    let (host, address) = start_host(&dir, None);

    let client = Client::connect(&address).unwrap();
    let bot = thread::spawn(move || {
        let strategy = RandomStrategy::new(StdRng::seed_from_u64(1));
        let mut bot = Bot::new(client, strategy, Duration::from_millis(2));
        bot.run("Bot")
    });

    // Wait for the bot to show up in the lobby.
    let mut closed = false;
    for _ in 0..500 {
        if host.close_lobby().is_ok() {
            closed = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert!(closed);

    let host_thread = thread::spawn(move || {
        let mut strategy = RandomStrategy::new(StdRng::seed_from_u64(2));
        host.play(&mut strategy)
    });
    let host_winner = host_thread.join().unwrap().unwrap();
    let bot_winner = bot.join().unwrap().unwrap();
    assert_eq!(host_winner, bot_winner);
    assert!(host_winner.count() >= 2);
}

#[test]
fn silent_remote_player_forfeits() {
    let dir = tempfile::tempdir().unwrap();
    let (host, address) = start_host(&dir, Some(Duration::from_millis(5)));

    let mut sleepy = Client::connect(&address).unwrap();
    sleepy.join("Sleepy").unwrap();
    host.close_lobby().unwrap();
    let winner = thread::spawn(move || host.play(&mut FifoStrategy))
        .join()
        .unwrap()
        .unwrap();
    assert_eq!(winner.seat, Seat(0));

    // After the game the winner is part of every view.
    match sleepy.poll().unwrap() {
        ReplyValue::Game(view) => assert_eq!(view.winner.map(|w| w.seat), Some(Seat(0))),
        other => panic!("unexpected reply {:?}", other),
    }
}
