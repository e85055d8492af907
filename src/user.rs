use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_HEADER: &str = "user";

/// Name from the `User` header, if there is a usable one.
#[derive(Debug, Clone, Default)]
pub struct User(pub Option<String>);

impl User {
    pub fn name_or_empty(self) -> String {
        self.0.unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for User
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .filter(|name| !name.trim().is_empty())
            .map(str::to_owned);

        Ok(User(name))
    }
}
