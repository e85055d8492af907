use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("name {0:?} is already in use")]
    Conflict(String),

    #[error("message type does not match recipient: {0}")]
    Semantic(String),

    #[error("sender {0:?} is not in the room")]
    UnknownSender(String),

    #[error("participant {0:?} not found")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),
}

impl ChatError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ChatError::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        ChatError::Storage(anyhow::Error::msg(msg.into()))
    }
}

impl From<sqlx::Error> for ChatError {
    fn from(err: sqlx::Error) -> Self {
        ChatError::Storage(err.into())
    }
}
