/// Request extractors for credentials
pub mod auth;

pub use auth::{BearerCredential, SessionUser, SESSION_COOKIE};
