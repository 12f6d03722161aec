mod account;
mod audio;
mod resource;
mod scope;

pub use account::{Account, InviteCode, UNLIMITED_USES};
pub use audio::AudioType;
pub use resource::{CatalogResource, TrackNumber};
pub use scope::ShareScope;
