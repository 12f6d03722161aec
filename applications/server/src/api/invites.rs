/// Invite code administration
use crate::{
    api::account::require_admin,
    error::{Result, ServerError},
    middleware::SessionUser,
    state::AppState,
};
use annil_core::{InviteCode, UNLIMITED_USES};
use annil_storage::invites;
use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateInviteForm {
    #[serde(default)]
    pub limit: String,
}

#[derive(Debug, Deserialize)]
pub struct RevokeInviteForm {
    #[serde(default)]
    pub code: String,
}

/// POST /api/createInviteCode
/// `limit` is -1 (unlimited) or a positive number of uses
pub async fn create_invite_code(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<CreateInviteForm>,
) -> Result<String> {
    require_admin(&app_state, &user).await?;

    let limit = form
        .limit
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|limit| *limit == UNLIMITED_USES || *limit >= 1)
        .ok_or_else(|| ServerError::BadRequest(format!("Invalid invite limit: {:?}", form.limit)))?;

    let invite = invites::create(app_state.db.pool(), limit).await?;
    tracing::info!(by = %user.username(), limit, "Invite code created");
    Ok(invite.code)
}

/// POST /api/listInviteCodes
pub async fn list_invite_codes(
    State(app_state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<InviteCode>>> {
    require_admin(&app_state, &user).await?;
    Ok(Json(invites::list(app_state.db.pool()).await?))
}

/// POST /api/revokeInviteCode
pub async fn revoke_invite_code(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<RevokeInviteForm>,
) -> Result<StatusCode> {
    require_admin(&app_state, &user).await?;

    if !invites::revoke(app_state.db.pool(), &form.code).await? {
        return Err(ServerError::NotFound(format!("Invite code not found: {}", form.code)));
    }

    tracing::info!(by = %user.username(), "Invite code revoked");
    Ok(StatusCode::OK)
}
