//! Annil Storage
//!
//! `SQLite` account store for the Annil server: accounts with their
//! registration time and capabilities, plus the invite-code ledger that gates
//! registration.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each table owns its queries (`accounts`, `invites`)
//! - **Collaborator contract**: `Database` implements `annil_core::AccountDirectory`,
//!   which is all token verification ever asks of this crate
//!
//! # Example
//!
//! ```rust,no_run
//! use annil_storage::{accounts, invites, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("sqlite://annil.db").await?;
//!
//! let code = invites::create(db.pool(), 1).await?;
//! if invites::redeem(db.pool(), &code.code).await? {
//!     accounts::create(db.pool(), "alice", "$2b$12$...").await?;
//! }
//! # Ok(())
//! # }
//! ```

mod database;
mod error;

// Vertical slices
pub mod accounts;
pub mod invites;

pub use database::Database;
pub use error::{Result, StorageError};
