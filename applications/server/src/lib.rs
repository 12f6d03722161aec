//! Annil Server Library
//!
//! Audio library server: signed account and share tokens, permission-gated
//! content delivery over pluggable backends, and invite-based account management.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod library;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{Permission, PermissionEvaluator, SessionStore, TokenService};
pub use state::AppState;
