pub mod chat;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod model;
pub mod participants;
pub mod store;
pub mod user;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{chat::Chat, error::ChatError};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub chat: Arc<Chat>,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(participants::router())
        .merge(messages::router())
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "OK"
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use ChatError::*;
        let status = match self.0.downcast_ref::<ChatError>() {
            Some(Validation(_) | Semantic(_) | UnknownSender(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(Conflict(_)) => StatusCode::CONFLICT,
            Some(NotFound(_)) => StatusCode::NOT_FOUND,
            Some(Storage(_)) | None => {
                tracing::error!("request failed: {:#}", self.0);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}\n\n{}", self.0, self.0.backtrace()),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
