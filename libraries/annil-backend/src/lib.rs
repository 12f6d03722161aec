//! Annil Backends
//!
//! Implementations of `annil_core::Backend`:
//!
//! - **`FileBackend`**: catalogs are directories under a root on local disk
//! - **`RelayBackend`**: proxies another Annil peer over HTTP
//! - **`Multiplexer`**: tries an ordered list of backends, first success wins
//!
//! # Example
//!
//! ```rust,no_run
//! use annil_backend::{FileBackend, Multiplexer, RelayBackend};
//! use annil_core::Backend;
//! use std::time::Duration;
//!
//! # async fn example() -> annil_core::Result<()> {
//! let local = FileBackend::new("/srv/music").await?;
//! let peer = RelayBackend::new("https://peer.example.com/", "a.b.c")?;
//!
//! let library = Multiplexer::new(vec![Box::new(local), Box::new(peer)])
//!     .with_timeout(Duration::from_secs(10));
//!
//! let (audio_type, _stream) = library.get_audio("some-album", 7).await?;
//! println!("{audio_type:?}");
//! # Ok(())
//! # }
//! ```

mod file;
mod multiplexer;
mod relay;

pub use file::{FileBackend, COVER_FILE_NAME};
pub use multiplexer::{Multiplexer, DEFAULT_BACKEND_TIMEOUT};
pub use relay::RelayBackend;
