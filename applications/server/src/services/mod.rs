/// Server services
pub mod password;
pub mod permission;
pub mod session;
pub mod token;

pub use password::PasswordHasher;
pub use permission::{Permission, PermissionEvaluator};
pub use session::SessionStore;
pub use token::TokenService;
