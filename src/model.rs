use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Millis;

/// Reserved recipient meaning "everyone in the room".
pub const BROADCAST_TARGET: &str = "Todos";

pub const JOINED: &str = "joined";
pub const LEFT: &str = "left";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub last_seen: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "message")]
    Broadcast,
    #[serde(rename = "private_message")]
    Direct,
    #[serde(rename = "status")]
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        use MessageKind::*;
        match self {
            Broadcast => "message",
            Direct => "private_message",
            System => "status",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown message type {:?}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for MessageKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageKind::Broadcast),
            "private_message" => Ok(MessageKind::Direct),
            "status" => Ok(MessageKind::System),
            other => Err(UnknownKind(other.to_owned())),
        }
    }
}

/// A message before the log has given it a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

impl NewMessage {
    pub fn notice(name: &str, text: &str) -> Self {
        NewMessage {
            from: name.to_owned(),
            to: BROADCAST_TARGET.to_owned(),
            text: text.to_owned(),
            kind: MessageKind::System,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub seq: i64,
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub timestamp: Millis,
}

impl Message {
    pub fn is_visible_to(&self, requester: &str) -> bool {
        match self.kind {
            MessageKind::Broadcast | MessageKind::System => true,
            MessageKind::Direct => self.to == requester || self.from == requester,
        }
    }
}
