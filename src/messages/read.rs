use std::sync::Arc;

use axum::{
    Json, debug_handler,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{AppResult, AppState, chat::Chat, error::ChatError, user::User};

use super::MessageView;

#[derive(Debug, Deserialize)]
pub(crate) struct ReadQuery {
    limit: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn read(
    State(chat): State<Arc<Chat>>,
    user: User,
    Query(ReadQuery { limit }): Query<ReadQuery>,
) -> AppResult<Json<Vec<MessageView>>> {
    let limit = match limit.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ChatError::validation(format!("limit {raw:?} is not an integer")))?,
        ),
    };

    let messages = chat.read(&user.name_or_empty(), limit).await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}
