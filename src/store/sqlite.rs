use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    clock::Millis,
    error::{ChatError, ChatResult},
    model::{Message, MessageKind, NewMessage, Participant},
};

use super::{MessageCollection, ParticipantCollection};

type MessageRow = (i64, String, String, String, String, String, i64);

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

fn row_to_message((seq, id, from, to, text, kind, timestamp): MessageRow) -> ChatResult<Message> {
    Ok(Message {
        seq,
        id: Uuid::parse_str(&id).map_err(|e| ChatError::Storage(e.into()))?,
        from,
        to,
        text,
        kind: kind
            .parse::<MessageKind>()
            .map_err(|e| ChatError::storage(format!("message #{seq}: {e}")))?,
        timestamp,
    })
}

#[async_trait]
impl ParticipantCollection for SqliteStore {
    async fn insert_if_absent(&self, participant: &Participant) -> ChatResult<bool> {
        let result = sqlx::query(
            "INSERT INTO participants (name,last_seen) VALUES (?,?) ON CONFLICT(name) DO NOTHING",
        )
        .bind(&participant.name)
        .bind(participant.last_seen)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, name: &str) -> ChatResult<Option<Participant>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name,last_seen FROM participants WHERE name=?")
                .bind(name)
                .fetch_optional(&self.db_pool)
                .await?;

        Ok(row.map(|(name, last_seen)| Participant { name, last_seen }))
    }

    async fn touch(&self, name: &str, last_seen: Millis) -> ChatResult<bool> {
        let result = sqlx::query("UPDATE participants SET last_seen=? WHERE name=?")
            .bind(last_seen)
            .bind(name)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn scan(&self) -> ChatResult<Vec<Participant>> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT name,last_seen FROM participants")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(name, last_seen)| Participant { name, last_seen })
            .collect())
    }

    async fn remove(&self, name: &str) -> ChatResult<bool> {
        let result = sqlx::query("DELETE FROM participants WHERE name=?")
            .bind(name)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl MessageCollection for SqliteStore {
    async fn append(&self, message: NewMessage, timestamp: Millis) -> ChatResult<Message> {
        let id = Uuid::now_v7();
        let result = sqlx::query(
            "INSERT INTO messages (id,sender,recipient,body,kind,created_at) VALUES (?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.kind.as_str())
        .bind(timestamp)
        .execute(&self.db_pool)
        .await?;

        let NewMessage { from, to, text, kind } = message;
        Ok(Message {
            seq: result.last_insert_rowid(),
            id,
            from,
            to,
            text,
            kind,
            timestamp,
        })
    }

    async fn scan(&self) -> ChatResult<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT seq,id,sender,recipient,body,kind,created_at FROM messages ORDER BY seq",
        )
        .fetch_all(&self.db_pool)
        .await?;

        rows.into_iter().map(row_to_message).collect()
    }
}
