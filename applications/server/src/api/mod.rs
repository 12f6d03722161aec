/// API route modules
pub mod account;
pub mod content;
pub mod invites;
pub mod share;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full HTTP surface
pub fn create_router(app_state: AppState) -> Router {
    // Content routes, gated per request by the permission evaluator
    let content_routes = Router::new()
        .route("/albums", get(content::list_albums))
        .route("/share", post(share::create_share))
        .route("/:catalog/:item", get(content::get_item));

    // Account routes, gated by the session cookie
    let account_routes = Router::new()
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/revoke", post(account::revoke))
        .route("/grantAdmin", post(account::grant_admin))
        .route("/revokeAdmin", post(account::revoke_admin))
        .route("/allowShare", post(account::allow_share))
        .route("/disallowShare", post(account::disallow_share))
        .route("/changePassword", post(account::change_password))
        .route("/generateToken", post(account::generate_token))
        .route("/listUsers", post(account::list_users))
        .route("/current", post(account::current))
        .route("/createInviteCode", post(invites::create_invite_code))
        .route("/listInviteCodes", post(invites::list_invite_codes))
        .route("/revokeInviteCode", post(invites::revoke_invite_code));

    Router::new()
        .merge(content_routes)
        .nest("/api", account_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
