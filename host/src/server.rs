use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context;
use tracing::{debug, info, trace, warn};

use crate::dispatch::Dispatcher;

/// Listens on a Unix socket and answers newline-delimited JSON requests.
///
/// The socket file is removed again when the server is dropped.
pub struct Server {
    listener: UnixListener,
    path: PathBuf,
}

impl Server {
    /// Binds to `path`, replacing a socket file left behind by an earlier run.
    pub fn bind(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            debug!(path = %path.display(), "Removing stale socket");
            std::fs::remove_file(&path)
                .with_context(|| format!("Could not remove stale socket {}", path.display()))?;
        }
        let listener = UnixListener::bind(&path)
            .with_context(|| format!("Could not bind to {}", path.display()))?;
        info!(path = %path.display(), "Listening");
        Ok(Self { listener, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accepts connections forever, each served on its own thread.
    pub fn serve(&self, dispatcher: Dispatcher) -> anyhow::Result<()> {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(%err, "Could not accept connection");
                    continue;
                }
            };
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                if let Err(err) = serve_connection(stream, &dispatcher) {
                    debug!(%err, "Connection closed with an error");
                }
            });
        }
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            debug!(%err, "Could not remove socket");
        }
    }
}

/// Answers requests on one connection until the client hangs up.
fn serve_connection(stream: UnixStream, dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    // Should always be empty before reading the next request.
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            debug!("Client disconnected");
            return Ok(());
        }
        let line = buf.trim_end();
        if line.is_empty() {
            continue;
        }
        trace!(name: "Received request", request = %line);
        let reply = dispatcher.handle_line(line);
        let mut reply_json = serde_json::to_string(&reply)?;
        trace!(name: "Sending reply", reply = %reply_json);
        reply_json.push('\n');
        writer.write_all(reply_json.as_bytes())?;
        writer.flush()?;
    }
}
