use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use sequence::{Action, Card, Coord, PlayerId, Reply, ReplyValue, Request, Status};
use tracing::trace;

/// A blocking connection to a host. Sends one request and waits for its reply.
pub struct Client {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
    player_id: Option<PlayerId>,
    // A re-usable buffer for IO.
    // Should always be empty before and after request().
    buf: String,
}

impl Client {
    /// Connects to the host's socket, retrying a few times while the host starts up.
    pub fn connect(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut backoff = vec![
            Duration::from_secs(1),
            Duration::from_millis(500),
            Duration::from_millis(100),
        ];
        loop {
            match UnixStream::connect(path) {
                Ok(stream) => {
                    let writer = stream.try_clone()?;
                    return Ok(Self {
                        reader: BufReader::new(stream),
                        writer,
                        player_id: None,
                        buf: String::new(),
                    });
                }
                Err(err) => match backoff.pop() {
                    Some(delay) => thread::sleep(delay),
                    None => {
                        return Err(err)
                            .with_context(|| format!("Could not connect to {}", path.display()))
                    }
                },
            }
        }
    }

    /// Sends a raw line and parses the reply.
    pub fn send_line(&mut self, line: &str) -> anyhow::Result<Reply> {
        trace!(name: "Sending request", request = %line);
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            bail!("The host closed the connection");
        }
        let reply_json = self.buf.trim_end();
        trace!(name: "Received reply", reply = %reply_json);
        let reply = serde_json::from_str::<Reply>(reply_json)?;
        self.buf.clear();
        Ok(reply)
    }

    /// Sends `action` on behalf of the joined player and returns the reply, whatever its status.
    pub fn request(&mut self, action: Action) -> anyhow::Result<Reply> {
        let request = Request::new(self.player_id.clone(), action);
        let line = serde_json::to_string(&request)?;
        self.send_line(&line)
    }

    /// Like [`Client::request()`], but turns `err` and `unsupported` replies into errors.
    pub fn request_value(&mut self, action: Action) -> anyhow::Result<Option<ReplyValue>> {
        let reply = self.request(action)?;
        match (reply.status, reply.value) {
            (Status::Ack, value) => Ok(value),
            (status, Some(ReplyValue::Error { message })) => bail!("{:?}: {}", status, message),
            (status, _) => bail!("Request failed with status {:?}", status),
        }
    }

    /// Joins the lobby. The id is remembered for later requests.
    pub fn join(&mut self, name: &str) -> anyhow::Result<PlayerId> {
        let action = Action::Join {
            name: String::from(name),
        };
        match self.request_value(action)? {
            Some(ReplyValue::Joined { player_id }) => {
                self.player_id = Some(player_id.clone());
                Ok(player_id)
            }
            other => bail!("Invalid reply to join: {:?}", other),
        }
    }

    pub fn poll(&mut self) -> anyhow::Result<ReplyValue> {
        match self.request_value(Action::Poll)? {
            Some(value) => Ok(value),
            None => bail!("Empty reply to poll"),
        }
    }

    pub fn play(&mut self, card: Card, coord: Coord) -> anyhow::Result<ReplyValue> {
        match self.request_value(Action::Move { card, coord })? {
            Some(value) => Ok(value),
            None => bail!("Empty reply to move"),
        }
    }

    pub fn leave(&mut self) -> anyhow::Result<()> {
        self.request_value(Action::Leave)?;
        Ok(())
    }
}
