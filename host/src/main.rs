use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use host::{
    board_prompt, spawn_display, GameHost, HostConfig, HostStrategy, PromptStrategy, Server,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sequence::Strategy;
use tracing::{error, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path of the Unix socket that players connect to
    address: PathBuf,

    /// The name the host plays under
    #[arg(long, default_value = "Host")]
    name: String,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Forfeit the turn of a remote player who takes longer than this
    #[arg(long)]
    turn_timeout_secs: Option<u64>,

    /// Who plays the host's seat: "interactive", "fifo" or "random"
    #[arg(long, default_value = "interactive")]
    host_strategy: HostStrategy,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn into_config(self, seed: u64) -> HostConfig {
        HostConfig {
            address: self.address,
            name: self.name,
            seed,
            turn_timeout: self.turn_timeout_secs.map(Duration::from_secs),
            host_strategy: self.host_strategy,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let config = args.into_config(seed);

    let (display, _display_thread) = spawn_display(std::io::stdout());
    let host = GameHost::new(&config, display)?;
    let server = Server::bind(&config.address)?;
    let dispatcher = host.dispatcher();
    thread::spawn(move || {
        if let Err(err) = server.serve(dispatcher) {
            error!(%err, "Server stopped");
        }
    });

    wait_for_lobby_close(&host)?;

    let mut strategy: Box<dyn Strategy> = match config.host_strategy {
        HostStrategy::Interactive => {
            let mut prompt = PromptStrategy::new(std::io::stdin().lock(), std::io::stdout());
            prompt.show_board(&board_prompt(host.session())?);
            Box::new(prompt)
        }
        HostStrategy::Cpu(kind) => kind.build(StdRng::seed_from_u64(seed)),
    };
    let winner = host.play(strategy.as_mut())?;
    info!(seat = %winner.seat, sequences = winner.count(), "Winner");

    // Let the remaining players see the result before the socket goes away.
    thread::sleep(Duration::from_secs(2));
    std::fs::remove_file(&config.address).ok();
    Ok(())
}

/// Closes the lobby when the operator presses enter, once enough players have joined.
fn wait_for_lobby_close(host: &GameHost) -> anyhow::Result<()> {
    let mut stdin = std::io::stdin().lock();
    let mut buf = String::new();
    loop {
        buf.clear();
        if stdin.read_line(&mut buf)? == 0 {
            anyhow::bail!("Input closed before the lobby was closed");
        }
        match host.close_lobby() {
            Ok(()) => return Ok(()),
            Err(err) => println!(">> {}", err),
        }
    }
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
