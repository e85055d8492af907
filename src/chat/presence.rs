use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    clock::Millis,
    error::{ChatError, ChatResult},
    model::{JOINED, LEFT, Message, NewMessage, Participant},
    store::ParticipantCollection,
};

use super::messages::MessageLog;

/// Live membership, keyed by name.
///
/// Every operation runs inside one lock scope, so a registration's
/// check-then-insert, a heartbeat and an eviction decision on the same entry
/// can never interleave.
pub struct PresenceRegister {
    store: Arc<dyn ParticipantCollection>,
    lock: Mutex<()>,
}

impl PresenceRegister {
    pub fn new(store: Arc<dyn ParticipantCollection>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Adds `name` and announces it. If the announcement can't be written the
    /// entry is taken back out and the storage error is returned.
    pub async fn register(
        &self,
        name: &str,
        now: Millis,
        log: &MessageLog,
    ) -> ChatResult<Participant> {
        let _guard = self.lock.lock().await;

        let participant = Participant {
            name: name.to_owned(),
            last_seen: now,
        };
        if !self.store.insert_if_absent(&participant).await? {
            return Err(ChatError::Conflict(name.to_owned()));
        }

        if let Err(e) = log.append(NewMessage::notice(name, JOINED)).await {
            if let Err(undo) = self.store.remove(name).await {
                error!(name = %name, "failed to undo registration after {e}: {undo}");
            }
            return Err(e);
        }

        info!(name = %name, "participant joined");
        Ok(participant)
    }

    pub async fn heartbeat(&self, name: &str, now: Millis) -> ChatResult<()> {
        let _guard = self.lock.lock().await;

        if !self.store.touch(name, now).await? {
            return Err(ChatError::NotFound(name.to_owned()));
        }
        debug!(name = %name, now, "heartbeat");
        Ok(())
    }

    pub async fn list(&self) -> ChatResult<Vec<Participant>> {
        let _guard = self.lock.lock().await;
        self.store.scan().await
    }

    /// Appends `message` only if its sender is in the room, holding the lock
    /// across both steps so a sweep can't evict the sender in between.
    pub async fn append_from(&self, message: NewMessage, log: &MessageLog) -> ChatResult<Message> {
        let _guard = self.lock.lock().await;

        if self.store.get(&message.from).await?.is_none() {
            return Err(ChatError::UnknownSender(message.from));
        }
        log.append(message).await
    }

    /// Removes everyone silent for longer than `ttl` and posts a "left" notice
    /// for each. Removal wins over the notice: a notice that fails to append
    /// is logged and the sweep moves on.
    pub async fn evict_expired(
        &self,
        now: Millis,
        ttl: Duration,
        log: &MessageLog,
    ) -> ChatResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let ttl = Millis::try_from(ttl.as_millis()).unwrap_or(Millis::MAX);

        let mut evicted = Vec::new();
        for Participant { name, last_seen } in self.store.scan().await? {
            if now.saturating_sub(last_seen) <= ttl {
                continue;
            }

            match self.store.remove(&name).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    error!(name = %name, "failed to evict: {e}");
                    continue;
                }
            }

            if let Err(e) = log.append(NewMessage::notice(&name, LEFT)).await {
                warn!(name = %name, "evicted without a leave notice: {e}");
            }

            info!(name = %name, silent_ms = now.saturating_sub(last_seen), "participant evicted");
            evicted.push(name);
        }

        Ok(evicted)
    }
}
