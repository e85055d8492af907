mod join;
mod list;
mod status;

use axum::{Router, routing::post};
use serde::Serialize;

use crate::{AppState, clock::Millis, model::Participant};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants", post(join::join).get(list::list))
        .route("/status", post(status::status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParticipantView {
    name: String,
    last_status: Millis,
}

impl From<Participant> for ParticipantView {
    fn from(Participant { name, last_seen }: Participant) -> Self {
        ParticipantView {
            name,
            last_status: last_seen,
        }
    }
}
