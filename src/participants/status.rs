use std::sync::Arc;

use axum::{debug_handler, extract::State, http::StatusCode};

use crate::{AppResult, AppState, chat::Chat, error::ChatError, user::User};

/// Heartbeat. Keeps the `User` in the room for another TTL.
#[debug_handler(state = AppState)]
pub(crate) async fn status(State(chat): State<Arc<Chat>>, User(name): User) -> AppResult<StatusCode> {
    let Some(name) = name else {
        return Err(ChatError::NotFound(String::new()).into());
    };

    chat.heartbeat(&name).await?;
    Ok(StatusCode::OK)
}
