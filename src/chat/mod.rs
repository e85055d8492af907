//! Presence and message visibility: who is in the room, what each of them
//! is allowed to read, and the background sweep that drops the silent ones.

mod messages;
mod presence;
mod sweeper;

use std::sync::Arc;
use std::time::Duration;

use crate::{
    clock::Clock,
    error::{ChatError, ChatResult},
    model::{BROADCAST_TARGET, Message, MessageKind, NewMessage, Participant},
    store::{MemoryStore, MessageCollection, ParticipantCollection},
};

pub use messages::MessageLog;
pub use presence::PresenceRegister;
pub use sweeper::{SweepConfig, spawn_sweeper};

/// A message as a client submitted it, before any checks.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: String,
}

pub struct Chat {
    presence: PresenceRegister,
    messages: MessageLog,
    clock: Arc<dyn Clock>,
}

impl Chat {
    pub fn new(
        participants: Arc<dyn ParticipantCollection>,
        messages: Arc<dyn MessageCollection>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence: PresenceRegister::new(participants),
            messages: MessageLog::new(messages, clock.clone()),
            clock,
        }
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, clock)
    }

    pub async fn join(&self, name: &str) -> ChatResult<Participant> {
        if name.trim().is_empty() {
            return Err(ChatError::validation("name must not be empty"));
        }
        if name == BROADCAST_TARGET {
            return Err(ChatError::validation(format!(
                "{BROADCAST_TARGET} is reserved for broadcasts"
            )));
        }
        self.presence
            .register(name, self.clock.now(), &self.messages)
            .await
    }

    pub async fn heartbeat(&self, name: &str) -> ChatResult<()> {
        self.presence.heartbeat(name, self.clock.now()).await
    }

    pub async fn participants(&self) -> ChatResult<Vec<Participant>> {
        self.presence.list().await
    }

    /// Checks run shape first, then kind/recipient agreement, then whether the
    /// sender is in the room, so a malformed request learns nothing about who
    /// is present.
    pub async fn send(&self, draft: Draft) -> ChatResult<Message> {
        let Draft { from, to, text, kind } = draft;

        if from.trim().is_empty() {
            return Err(ChatError::validation("sender must not be empty"));
        }
        if to.trim().is_empty() {
            return Err(ChatError::validation("recipient must not be empty"));
        }
        let kind: MessageKind = kind
            .parse()
            .map_err(|e| ChatError::validation(format!("{e}")))?;
        if text.trim().is_empty() {
            return Err(ChatError::validation("text must not be empty"));
        }

        match kind {
            MessageKind::Broadcast if to != BROADCAST_TARGET => {
                return Err(ChatError::Semantic(format!(
                    "a {kind} must be addressed to {BROADCAST_TARGET}"
                )));
            }
            MessageKind::Direct if to == BROADCAST_TARGET => {
                return Err(ChatError::Semantic(format!(
                    "a {kind} can't be addressed to {BROADCAST_TARGET}"
                )));
            }
            _ => {}
        }

        self.presence
            .append_from(NewMessage { from, to, text, kind }, &self.messages)
            .await
    }

    pub async fn read(&self, requester: &str, limit: Option<i64>) -> ChatResult<Vec<Message>> {
        self.messages.read(requester, limit).await
    }

    pub async fn evict_expired(&self, ttl: Duration) -> ChatResult<Vec<String>> {
        self.presence
            .evict_expired(self.clock.now(), ttl, &self.messages)
            .await
    }
}
