//! Annil Core
//!
//! Shared types, traits, and error handling for the Annil audio library server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `AudioType`, `CatalogResource`, `ShareScope`, `Account`, `InviteCode`
//! - **Core Traits**: `Backend` (content sources) and `AccountDirectory` (account lookups)
//! - **Error Handling**: Unified `AnnilError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use annil_core::{CatalogResource, ShareScope};
//!
//! let mut scope = ShareScope::new();
//! scope.grant_track("album-1", 3);
//! scope.grant_cover("album-2");
//!
//! assert!(scope.permits(&CatalogResource::track("album-1", 3)));
//! assert!(scope.permits(&CatalogResource::cover("album-2")));
//! assert!(!scope.permits(&CatalogResource::track("album-2", 1)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AnnilError, Result};
pub use traits::{AccountDirectory, Backend, ContentStream};
pub use types::{
    Account, AudioType, CatalogResource, InviteCode, ShareScope, TrackNumber, UNLIMITED_USES,
};
