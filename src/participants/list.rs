use std::sync::Arc;

use axum::{Json, debug_handler, extract::State};

use crate::{AppResult, AppState, chat::Chat};

use super::ParticipantView;

#[debug_handler(state = AppState)]
pub(crate) async fn list(State(chat): State<Arc<Chat>>) -> AppResult<Json<Vec<ParticipantView>>> {
    let mut participants = chat.participants().await?;
    participants.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(participants.into_iter().map(Into::into).collect()))
}
