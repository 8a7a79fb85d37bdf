mod stats;

use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sequence::{hand_size, play_strategy_turn, Game, StrategyKind};
use stats::{summarize, GameRecord};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const CPU_NAMES: [&str; 12] = [
    "Abbott",
    "Bionicle",
    "Cleopatra",
    "David",
    "Erasmus",
    "Fergus",
    "Gwendolyn",
    "Horatio",
    "Isolde",
    "Jasper",
    "Kunigunde",
    "Lysander",
];

/// Games that run longer than this are abandoned.
const MAX_TURNS: u32 = 10_000;

#[derive(Parser)]
struct Args {
    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// Players per game
    #[arg(short, long, default_value_t = 2)]
    players: usize,

    /// The strategy every player uses: "fifo" or "random"
    #[arg(long, default_value = "random")]
    strategy: StrategyKind,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn play_game(num_players: usize, kind: StrategyKind, rng: &mut StdRng) -> anyhow::Result<GameRecord> {
    let names = CPU_NAMES[..num_players].iter().map(|&n| String::from(n)).collect();
    let mut game = Game::new(names, StdRng::seed_from_u64(rng.gen()))?;
    let mut strategies: Vec<_> = (0..num_players)
        .map(|_| kind.build(StdRng::seed_from_u64(rng.gen())))
        .collect();

    let start = Instant::now();
    for _ in 0..MAX_TURNS {
        if game.is_over() {
            break;
        }
        let seat = game.current_seat();
        play_strategy_turn(&mut game, &mut strategies[seat.index()])?;
    }
    let elapsed = start.elapsed();

    if let Some(winner) = game.winner() {
        debug!(winner = CPU_NAMES[winner.seat.index()], turns = game.turn_count(), "Game over");
    } else {
        warn!(turns = game.turn_count(), "Game abandoned without a winner");
    }
    Ok(GameRecord {
        turns: game.turn_count(),
        elapsed,
        finished: game.is_over(),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    if hand_size(args.players).is_none() {
        anyhow::bail!("Cannot deal a game for {} players", args.players);
    }

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut records = Vec::with_capacity(args.num_games);
    for game_idx in 0..args.num_games {
        let record = play_game(args.players, args.strategy, &mut rng)?;
        debug!(game_idx, turns = record.turns);
        records.push(record);
    }

    let Some(summary) = summarize(&records) else {
        eprintln!("No games played");
        return Ok(());
    };
    println!(
        "{} games, {} players, strategy {}",
        summary.games, args.players, args.strategy
    );
    if summary.unfinished > 0 {
        println!("- {} games abandoned after {} turns", summary.unfinished, MAX_TURNS);
    }
    println!("- mean turns:         {:.1}", summary.mean_turns);
    println!("- median turns:       {:.1}", summary.median_turns);
    println!("- mean time:          {:?}", summary.mean_time);
    println!("- median time:        {:?}", summary.median_time);
    println!("- mean time per turn: {:?}", summary.mean_time_per_turn);
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
