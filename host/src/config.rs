use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sequence::{StrategyKind, UnknownStrategy};

/// Who makes the moves for the host's own seat.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostStrategy {
    /// Prompt on the terminal.
    Interactive,
    Cpu(StrategyKind),
}

impl FromStr for HostStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("interactive") {
            Ok(HostStrategy::Interactive)
        } else {
            s.parse().map(HostStrategy::Cpu)
        }
    }
}

pub struct HostConfig {
    /// Path of the Unix socket to listen on.
    pub address: PathBuf,
    /// The name the host plays under.
    pub name: String,
    pub seed: u64,
    /// How long a remote player may take for a move. `None` waits forever.
    pub turn_timeout: Option<Duration>,
    pub host_strategy: HostStrategy,
}
