use std::sync::Arc;

use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    AppResult, AppState,
    chat::{Chat, Draft},
    user::User,
};

use super::MessageView;

// Missing fields come through empty so the chat core reports them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SendBody {
    to: String,
    text: String,
    #[serde(rename = "type")]
    kind: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn send(
    State(chat): State<Arc<Chat>>,
    user: User,
    Json(SendBody { to, text, kind }): Json<SendBody>,
) -> AppResult<(StatusCode, Json<MessageView>)> {
    let message = chat
        .send(Draft {
            from: user.name_or_empty(),
            to,
            text,
            kind,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}
