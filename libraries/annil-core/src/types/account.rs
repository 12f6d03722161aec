/// Account and invite records owned by the account store
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `remaining_uses` value of an invite code that never runs out
pub const UNLIMITED_USES: i64 = -1;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,

    /// Whether the account may create share tokens
    pub allow_share: bool,

    #[serde(rename = "admin")]
    pub is_admin: bool,

    pub registered_at: DateTime<Utc>,
}

/// An invite code gating registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCode {
    pub code: String,

    /// Redemptions left, or `UNLIMITED_USES`
    pub remaining_uses: i64,
}

impl InviteCode {
    pub fn is_unlimited(&self) -> bool {
        self.remaining_uses == UNLIMITED_USES
    }
}
