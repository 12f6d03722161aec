//! Invite-code ledger
//!
//! Each code carries a remaining-use counter (`UNLIMITED_USES` never runs
//! out). Redemption is a single conditional update, so concurrent requests
//! can never spend the same use twice.

use crate::{Result, StorageError};
use annil_core::{InviteCode, UNLIMITED_USES};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Create a code good for `limit` registrations (`UNLIMITED_USES` for no limit)
///
/// # Errors
///
/// Returns `StorageError::InvalidInput` for a limit of zero or below -1
pub async fn create(pool: &SqlitePool, limit: i64) -> Result<InviteCode> {
    if limit == 0 || limit < UNLIMITED_USES {
        return Err(StorageError::InvalidInput(format!(
            "invite limit must be {UNLIMITED_USES} or positive, got {limit}"
        )));
    }

    let invite = InviteCode {
        code: Uuid::new_v4().to_string(),
        remaining_uses: limit,
    };

    sqlx::query("INSERT INTO invite_codes (code, remaining_uses) VALUES (?, ?)")
        .bind(&invite.code)
        .bind(invite.remaining_uses)
        .execute(pool)
        .await?;

    tracing::info!(remaining_uses = limit, "Invite code created");
    Ok(invite)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<InviteCode>> {
    let rows = sqlx::query("SELECT code, remaining_uses FROM invite_codes ORDER BY code")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            Ok(InviteCode {
                code: row.try_get("code")?,
                remaining_uses: row.try_get("remaining_uses")?,
            })
        })
        .collect()
}

/// Delete a code. Returns whether it existed.
pub async fn revoke(pool: &SqlitePool, code: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM invite_codes WHERE code = ?")
        .bind(code)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Spend one use of `code`. Returns `false` if the code is unknown or used up.
///
/// A code whose counter reaches zero is deleted in the same transaction.
pub async fn redeem(pool: &SqlitePool, code: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE invite_codes
         SET remaining_uses = CASE WHEN remaining_uses = ? THEN remaining_uses ELSE remaining_uses - 1 END
         WHERE code = ? AND (remaining_uses > 0 OR remaining_uses = ?)",
    )
    .bind(UNLIMITED_USES)
    .bind(code)
    .bind(UNLIMITED_USES)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM invite_codes WHERE code = ? AND remaining_uses = 0")
        .bind(code)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!("Invite code redeemed");
    Ok(true)
}
