//! Collections the chat core keeps its state in.
//!
//! The core only needs insert-if-absent, point lookup, full scan, delete and
//! an append-only ordered log. [`MemoryStore`] keeps everything in process,
//! [`SqliteStore`] keeps it in a sqlite database.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::{
    clock::Millis,
    error::ChatResult,
    model::{Message, NewMessage, Participant},
};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait ParticipantCollection: Send + Sync {
    /// Returns `false` without touching anything when `name` is taken.
    async fn insert_if_absent(&self, participant: &Participant) -> ChatResult<bool>;

    async fn get(&self, name: &str) -> ChatResult<Option<Participant>>;

    /// Returns `false` when no entry matches.
    async fn touch(&self, name: &str, last_seen: Millis) -> ChatResult<bool>;

    async fn scan(&self) -> ChatResult<Vec<Participant>>;

    async fn remove(&self, name: &str) -> ChatResult<bool>;
}

#[async_trait]
pub trait MessageCollection: Send + Sync {
    /// Gives the message the next position in the log. Positions are
    /// strictly increasing across concurrent callers.
    async fn append(&self, message: NewMessage, timestamp: Millis) -> ChatResult<Message>;

    /// Whole log, oldest first.
    async fn scan(&self) -> ChatResult<Vec<Message>>;
}
