mod read;
mod send;

use axum::{Router, routing::get};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    AppState,
    clock::{Millis, clock_label},
    model::{Message, MessageKind},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/messages", get(read::read).post(send::send))
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageView {
    id: Uuid,
    from: String,
    to: String,
    text: String,
    #[serde(rename = "type")]
    kind: MessageKind,
    time: String,
    timestamp: Millis,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        MessageView {
            id: message.id,
            time: clock_label(message.timestamp),
            timestamp: message.timestamp,
            from: message.from,
            to: message.to,
            text: message.text,
            kind: message.kind,
        }
    }
}
