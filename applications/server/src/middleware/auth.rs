/// Credential extractors
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

/// Name of the login session cookie
pub const SESSION_COOKIE: &str = "sessionId";

/// Raw token from the `Authorization` header, if any.
///
/// Accepts the token with or without a `Bearer ` prefix.
#[derive(Debug, Clone, Default)]
pub struct BearerCredential(pub Option<String>);

impl BearerCredential {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerCredential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|value| {
                let value = value.trim();
                value.strip_prefix("Bearer ").unwrap_or(value).to_string()
            })
            .filter(|token| !token.is_empty());

        Ok(Self(token))
    }
}

/// Username behind a live login session
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

impl SessionUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| ServerError::Auth("Missing session".to_string()))?;

        state
            .sessions
            .authorize(&session_id)
            .await
            .map(SessionUser)
            .ok_or_else(|| ServerError::Auth("Invalid session".to_string()))
    }
}
