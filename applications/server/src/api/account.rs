/// Account API routes
///
/// Every route except login and register requires a live session cookie.
use crate::{
    error::{Result, ServerError},
    middleware::{SessionUser, SESSION_COOKIE},
    state::AppState,
};
use annil_core::Account;
use annil_storage::{accounts, StorageError};
use axum::{extract::State, http::StatusCode, Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 5;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z_]{2,15}$").expect("username pattern is valid"));

pub const USERNAME_UNAVAILABLE: &str = "USERNAME_UNAVAILABLE";
pub const PASSWORD_TOO_SHORT: &str = "PASSWORD_TOO_SHORT";
pub const INVALID_INVITE_CODE: &str = "INVALID_INVITE_CODE";
pub const WRONG_OLD_PASSWORD: &str = "WRONG_OLD_PASSWORD";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub invite_code: String,
}

#[derive(Debug, Deserialize)]
pub struct TargetForm {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}

/// POST /api/login
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, StatusCode)> {
    if !check_password(&app_state, &form.username, &form.password).await? {
        tracing::debug!(username = %form.username, "Login rejected");
        return Err(ServerError::Auth("Invalid username or password".to_string()));
    }

    let session_id = app_state.sessions.create_session(&form.username).await;
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true);

    tracing::info!(username = %form.username, "User logged in");
    Ok((jar.add(cookie), StatusCode::OK))
}

/// POST /api/register
/// Create an account by redeeming an invite code
pub async fn register(
    State(app_state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<StatusCode> {
    let pool = app_state.db.pool();

    if !is_valid_username(&form.username) || accounts::exists(pool, &form.username).await? {
        return Err(ServerError::rejected(
            StatusCode::CONFLICT,
            USERNAME_UNAVAILABLE,
        ));
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        return Err(ServerError::rejected(
            StatusCode::FORBIDDEN,
            PASSWORD_TOO_SHORT,
        ));
    }
    if !annil_storage::invites::redeem(pool, &form.invite_code).await? {
        return Err(ServerError::rejected(
            StatusCode::FORBIDDEN,
            INVALID_INVITE_CODE,
        ));
    }

    let hash = app_state.passwords.hash(&form.password)?;
    match accounts::create(pool, &form.username, &hash).await {
        Ok(_) => {
            tracing::info!(username = %form.username, "Account registered");
            Ok(StatusCode::OK)
        }
        // Lost a race with a concurrent registration of the same name
        Err(StorageError::Duplicate(_)) => Err(ServerError::rejected(
            StatusCode::CONFLICT,
            USERNAME_UNAVAILABLE,
        )),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/revoke
/// Delete an account; allowed on oneself or by an admin.
///
/// Deleting the account invalidates every token and session it owns.
pub async fn revoke(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<TargetForm>,
) -> Result<StatusCode> {
    let pool = app_state.db.pool();
    require_account(&app_state, &form.username).await?;

    if form.username != user.username() && !accounts::is_admin(pool, user.username()).await? {
        return Err(ServerError::Forbidden(
            "Only admins may revoke other accounts".to_string(),
        ));
    }

    accounts::delete(pool, &form.username).await?;
    tracing::info!(username = %form.username, by = %user.username(), "Account revoked");
    Ok(StatusCode::OK)
}

/// POST /api/grantAdmin
pub async fn grant_admin(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<TargetForm>,
) -> Result<StatusCode> {
    require_admin(&app_state, &user).await?;
    require_account(&app_state, &form.username).await?;

    accounts::set_admin(app_state.db.pool(), &form.username, true).await?;
    tracing::info!(username = %form.username, by = %user.username(), "Admin granted");
    Ok(StatusCode::OK)
}

/// POST /api/revokeAdmin
/// An admin cannot demote themself
pub async fn revoke_admin(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<TargetForm>,
) -> Result<StatusCode> {
    require_admin(&app_state, &user).await?;
    require_account(&app_state, &form.username).await?;
    if form.username == user.username() {
        return Err(ServerError::Forbidden(
            "Admins cannot revoke their own admin rights".to_string(),
        ));
    }

    accounts::set_admin(app_state.db.pool(), &form.username, false).await?;
    tracing::info!(username = %form.username, by = %user.username(), "Admin revoked");
    Ok(StatusCode::OK)
}

/// POST /api/allowShare
pub async fn allow_share(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<TargetForm>,
) -> Result<StatusCode> {
    set_share(&app_state, &user, &form.username, true).await
}

/// POST /api/disallowShare
pub async fn disallow_share(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<TargetForm>,
) -> Result<StatusCode> {
    set_share(&app_state, &user, &form.username, false).await
}

async fn set_share(
    app_state: &AppState,
    user: &SessionUser,
    username: &str,
    allow: bool,
) -> Result<StatusCode> {
    require_admin(app_state, user).await?;
    require_account(app_state, username).await?;

    accounts::set_allow_share(app_state.db.pool(), username, allow).await?;
    tracing::info!(username, allow, by = %user.username(), "Share capability changed");
    Ok(StatusCode::OK)
}

/// POST /api/changePassword
pub async fn change_password(
    State(app_state): State<AppState>,
    user: SessionUser,
    Form(form): Form<ChangePasswordForm>,
) -> Result<StatusCode> {
    if !check_password(&app_state, user.username(), &form.old_password).await? {
        return Err(ServerError::rejected(
            StatusCode::FORBIDDEN,
            WRONG_OLD_PASSWORD,
        ));
    }
    if form.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ServerError::rejected(
            StatusCode::FORBIDDEN,
            PASSWORD_TOO_SHORT,
        ));
    }

    let hash = app_state.passwords.hash(&form.new_password)?;
    accounts::set_password_hash(app_state.db.pool(), user.username(), &hash).await?;
    tracing::info!(username = %user.username(), "Password changed");
    Ok(StatusCode::OK)
}

/// POST /api/generateToken
pub async fn generate_token(
    State(app_state): State<AppState>,
    user: SessionUser,
) -> Result<String> {
    app_state.tokens.issue_account_token(user.username()).await
}

/// POST /api/listUsers
pub async fn list_users(
    State(app_state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<Account>>> {
    require_admin(&app_state, &user).await?;
    Ok(Json(accounts::list(app_state.db.pool()).await?))
}

/// POST /api/current
pub async fn current(user: SessionUser) -> String {
    user.0
}

async fn check_password(app_state: &AppState, username: &str, password: &str) -> Result<bool> {
    let hash = accounts::password_hash(app_state.db.pool(), username).await?;
    Ok(hash.is_some_and(|hash| app_state.passwords.verify(password, &hash)))
}

pub(crate) async fn require_admin(app_state: &AppState, user: &SessionUser) -> Result<()> {
    if accounts::is_admin(app_state.db.pool(), user.username()).await? {
        Ok(())
    } else {
        Err(ServerError::Forbidden("Admin rights required".to_string()))
    }
}

async fn require_account(app_state: &AppState, username: &str) -> Result<()> {
    if accounts::exists(app_state.db.pool(), username).await? {
        Ok(())
    } else {
        Err(ServerError::NotFound(format!("User not found: {username}")))
    }
}
