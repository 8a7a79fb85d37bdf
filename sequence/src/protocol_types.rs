use serde::{Deserialize, Serialize};

use crate::{Card, Coord, PlayerView, Seat};

/// Bumped whenever the shape of [`Request`] or [`Reply`] changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// The opaque id a player receives when joining. Needed for every later request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message from a client to the host. Every request gets exactly one [`Reply`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub version: u32,
    /// Absent only for [`Action::Join`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    pub action: Action,
}

impl Request {
    pub fn new(player_id: Option<PlayerId>, action: Action) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            player_id,
            action,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "UPPERCASE")]
pub enum Action {
    /// Enter the lobby under the given display name.
    ///
    /// The reply is [`ReplyValue::Joined`].
    Join { name: String },
    /// Play `card` on `coord`. Only allowed for the player holding the turn.
    ///
    /// The reply is [`ReplyValue::Game`], or [`ReplyValue::Exchanged`] if the
    /// card turned out to be dead, in which case the turn is not over yet.
    Move { card: Card, coord: Coord },
    /// Ask for the current state: [`ReplyValue::Lobby`] before the game starts,
    /// [`ReplyValue::Game`] afterwards.
    Poll,
    /// Reserved. Acknowledged without effect.
    Leave,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ack,
    Err,
    /// The request could not be understood, e.g. because of a version mismatch.
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub version: u32,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ReplyValue>,
}

impl Reply {
    pub fn ack(value: ReplyValue) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            status: Status::Ack,
            value: Some(value),
        }
    }

    /// An acknowledgement without data.
    pub fn okay() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            status: Status::Ack,
            value: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            status: Status::Err,
            value: Some(ReplyValue::Error {
                message: message.into(),
            }),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            status: Status::Unsupported,
            value: Some(ReplyValue::Error {
                message: message.into(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReplyValue {
    Joined { player_id: PlayerId },
    Lobby(LobbyView),
    Game(Box<PlayerView>),
    Exchanged {
        discarded: Card,
        drawn: Card,
        view: Box<PlayerView>,
    },
    Error { message: String },
}

/// The public roster while players are still joining.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyView {
    pub open: bool,
    /// Names in joining order. The position is the seat a player will take.
    pub players: Vec<LobbyEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyEntry {
    pub seat: Seat,
    pub name: String,
}
