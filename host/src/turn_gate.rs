use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::time::Duration;

use tracing::trace;

/// Creates the single-slot handoff between request handlers and the game loop.
pub fn turn_gate() -> (TurnSignal, TurnWaiter) {
    let (tx, rx) = mpsc::sync_channel(1);
    (TurnSignal { tx }, TurnWaiter { rx })
}

/// Held by request handlers. Releases the game loop after a valid move.
#[derive(Clone, Debug)]
pub struct TurnSignal {
    tx: SyncSender<()>,
}

impl TurnSignal {
    pub fn release(&self) {
        match self.tx.try_send(()) {
            Ok(()) => trace!("Turn gate released"),
            // Already released, the game loop has not picked it up yet.
            Err(TrySendError::Full(())) => {}
            // The game loop is gone, nobody is waiting.
            Err(TrySendError::Disconnected(())) => {}
        }
    }
}

/// Held by the game loop.
#[derive(Debug)]
pub struct TurnWaiter {
    rx: Receiver<()>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Released,
    TimedOut,
    /// Every [`TurnSignal`] has been dropped.
    Closed,
}

impl TurnWaiter {
    /// Drops a release that belongs to an earlier turn.
    pub fn clear(&self) {
        while self.rx.try_recv().is_ok() {}
    }

    /// Blocks until the gate is released, or the timeout (if any) has passed.
    pub fn wait(&self, timeout: Option<Duration>) -> WaitOutcome {
        match timeout {
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(()) => WaitOutcome::Released,
                Err(RecvTimeoutError::Timeout) => WaitOutcome::TimedOut,
                Err(RecvTimeoutError::Disconnected) => WaitOutcome::Closed,
            },
            None => match self.rx.recv() {
                Ok(()) => WaitOutcome::Released,
                Err(_) => WaitOutcome::Closed,
            },
        }
    }
}
