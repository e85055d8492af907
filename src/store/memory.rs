use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    clock::Millis,
    error::ChatResult,
    model::{Message, NewMessage, Participant},
};

use super::{MessageCollection, ParticipantCollection};

#[derive(Debug, Default)]
pub struct MemoryStore {
    participants: Mutex<HashMap<String, Millis>>,
    messages: Mutex<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A panic while holding one of these leaves the data intact, so keep going.
fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl ParticipantCollection for MemoryStore {
    async fn insert_if_absent(&self, participant: &Participant) -> ChatResult<bool> {
        let mut participants = relock(&self.participants);
        if participants.contains_key(&participant.name) {
            return Ok(false);
        }
        participants.insert(participant.name.clone(), participant.last_seen);
        Ok(true)
    }

    async fn get(&self, name: &str) -> ChatResult<Option<Participant>> {
        Ok(relock(&self.participants)
            .get(name)
            .map(|&last_seen| Participant { name: name.to_owned(), last_seen }))
    }

    async fn touch(&self, name: &str, last_seen: Millis) -> ChatResult<bool> {
        match relock(&self.participants).get_mut(name) {
            Some(entry) => {
                *entry = last_seen;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn scan(&self) -> ChatResult<Vec<Participant>> {
        Ok(relock(&self.participants)
            .iter()
            .map(|(name, &last_seen)| Participant { name: name.clone(), last_seen })
            .collect())
    }

    async fn remove(&self, name: &str) -> ChatResult<bool> {
        Ok(relock(&self.participants).remove(name).is_some())
    }
}

#[async_trait]
impl MessageCollection for MemoryStore {
    async fn append(&self, message: NewMessage, timestamp: Millis) -> ChatResult<Message> {
        let mut messages = relock(&self.messages);
        let NewMessage { from, to, text, kind } = message;
        let message = Message {
            seq: messages.len() as i64 + 1,
            id: Uuid::now_v7(),
            from,
            to,
            text,
            kind,
            timestamp,
        };
        messages.push(message.clone());
        Ok(message)
    }

    async fn scan(&self) -> ChatResult<Vec<Message>> {
        Ok(relock(&self.messages).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MessageKind, BROADCAST_TARGET};

    fn ana(last_seen: Millis) -> Participant {
        Participant { name: "ana".to_owned(), last_seen }
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_the_first_entry() {
        let store = MemoryStore::new();
        assert!(store.insert_if_absent(&ana(1)).await.unwrap());
        assert!(!store.insert_if_absent(&ana(2)).await.unwrap());
        assert_eq!(store.get("ana").await.unwrap(), Some(ana(1)));
        assert_eq!(store.get("Ana").await.unwrap(), None);
    }

    #[tokio::test]
    async fn touch_and_remove_report_absence() {
        let store = MemoryStore::new();
        assert!(!store.touch("ana", 5).await.unwrap());
        assert!(!store.remove("ana").await.unwrap());

        store.insert_if_absent(&ana(1)).await.unwrap();
        assert!(store.touch("ana", 5).await.unwrap());
        assert_eq!(ParticipantCollection::scan(&store).await.unwrap(), vec![ana(5)]);
        assert!(store.remove("ana").await.unwrap());
        assert!(ParticipantCollection::scan(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appends_get_consecutive_positions() {
        let store = MemoryStore::new();
        for i in 0..3 {
            let msg = NewMessage {
                from: "ana".to_owned(),
                to: BROADCAST_TARGET.to_owned(),
                text: format!("#{i}"),
                kind: MessageKind::Broadcast,
            };
            store.append(msg, 100 + i).await.unwrap();
        }

        let log = MessageCollection::scan(&store).await.unwrap();
        let seqs: Vec<i64> = log.iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(log[2].text, "#2");
        assert_eq!(log[2].timestamp, 102);
    }
}
