use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    clock::{Clock, Millis},
    error::ChatResult,
    model::{Message, NewMessage},
    store::MessageCollection,
};

/// Append-only chat log.
pub struct MessageLog {
    store: Arc<dyn MessageCollection>,
    clock: Arc<dyn Clock>,
    /// Timestamp of the newest entry. Held while appending so stamps never
    /// run backwards against positions.
    newest: Mutex<Millis>,
}

impl MessageLog {
    pub fn new(store: Arc<dyn MessageCollection>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            newest: Mutex::new(Millis::MIN),
        }
    }

    pub async fn append(&self, message: NewMessage) -> ChatResult<Message> {
        let mut newest = self.newest.lock().await;
        let timestamp = self.clock.now().max(*newest);

        let appended = self.store.append(message, timestamp).await?;
        *newest = appended.timestamp;
        Ok(appended)
    }

    /// Messages `requester` may see, oldest first. A positive `limit` keeps
    /// only the newest `limit` of those.
    pub async fn read(&self, requester: &str, limit: Option<i64>) -> ChatResult<Vec<Message>> {
        let visible = self
            .store
            .scan()
            .await?
            .into_iter()
            .filter(|m| m.is_visible_to(requester))
            .collect();

        Ok(tail(visible, limit))
    }
}

fn tail(mut messages: Vec<Message>, limit: Option<i64>) -> Vec<Message> {
    match limit {
        Some(n) if n > 0 && (n as u64) < messages.len() as u64 => {
            messages.split_off(messages.len() - n as usize)
        }
        _ => messages,
    }
}
