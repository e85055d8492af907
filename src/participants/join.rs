use std::sync::Arc;

use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{AppResult, AppState, chat::Chat};

use super::ParticipantView;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct JoinBody {
    name: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn join(
    State(chat): State<Arc<Chat>>,
    Json(JoinBody { name }): Json<JoinBody>,
) -> AppResult<(StatusCode, Json<ParticipantView>)> {
    let participant = chat.join(&name).await?;

    Ok((StatusCode::CREATED, Json(participant.into())))
}
