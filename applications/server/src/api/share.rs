/// Share link creation
use crate::{
    error::{Result, ServerError},
    middleware::BearerCredential,
    state::AppState,
};
use annil_core::ShareScope;
use annil_storage::accounts;
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateShareRequest {
    pub audios: ShareScope,
    /// Lifetime in hours; 0 never expires
    #[serde(default)]
    pub expire: u32,
}

/// POST /share
/// Mint a share token for the caller's account token.
///
/// The body is parsed only after the caller is authenticated and allowed to share.
pub async fn create_share(
    State(app_state): State<AppState>,
    credential: BearerCredential,
    body: Bytes,
) -> Result<Response> {
    let token = credential
        .token()
        .ok_or_else(|| ServerError::Auth("Missing token".to_string()))?;
    let username = app_state.tokens.verify_account_token(token).await?;

    // The capability embedded in the token may be stale
    if !accounts::allow_share(app_state.db.pool(), &username).await? {
        return Err(ServerError::Forbidden(format!(
            "{username} is not allowed to share"
        )));
    }

    let request: CreateShareRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid share request: {e}")))?;

    let ttl = chrono::Duration::hours(i64::from(request.expire));
    let share = app_state
        .tokens
        .issue_share_token(&username, &request.audios, ttl)?;

    tracing::info!(
        username = %username,
        catalogs = request.audios.catalogs().count(),
        expire_hours = request.expire,
        "Share token issued"
    );

    Ok(([(header::CONTENT_TYPE, "text/plain")], share).into_response())
}
