use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sequence::StrategyKind;
use sequence_client::{Bot, Client};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path of the host's Unix socket
    address: PathBuf,

    /// The name to join under
    #[arg(long, default_value = "cpu")]
    name: String,

    /// How to pick cards and cells: "fifo" or "random"
    #[arg(long, default_value = "random")]
    strategy: StrategyKind,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// How long to wait between two polls
    #[arg(long, default_value_t = 200)]
    poll_interval_ms: u64,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let strategy = args.strategy.build(StdRng::seed_from_u64(seed));

    let client = Client::connect(&args.address)?;
    let mut bot = Bot::new(
        client,
        strategy,
        Duration::from_millis(args.poll_interval_ms),
    );
    let winner = bot.run(&args.name)?;
    info!(seat = %winner.seat, sequences = winner.count(), "Winner");
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
