//! Account records: credentials, capabilities, and registration time

use crate::{Result, StorageError};
use annil_core::Account;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const ACCOUNT_COLUMNS: &str = "username, allow_share, is_admin, registered_at";

/// Create an account registered now.
///
/// New accounts can neither share nor administer.
///
/// # Errors
///
/// Returns `StorageError::Duplicate` if the username is taken
pub async fn create(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<Account> {
    create_registered_at(pool, username, password_hash, Utc::now()).await
}

/// Create an account with an explicit registration time
pub async fn create_registered_at(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    registered_at: DateTime<Utc>,
) -> Result<Account> {
    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, allow_share, is_admin, registered_at)
         VALUES (?, ?, 0, 0, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(registered_at.timestamp())
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(StorageError::Duplicate(format!("username {username}")));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(username = %username, "Account created");

    get(pool, username)
        .await?
        .ok_or_else(|| StorageError::not_found("Account", username))
}

/// Delete an account. Returns whether it existed.
pub async fn delete(pool: &SqlitePool, username: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(pool: &SqlitePool, username: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

pub async fn get(pool: &SqlitePool, username: &str) -> Result<Option<Account>> {
    let row = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(account_from_row).transpose()
}

/// All accounts, ordered by username
pub async fn list(pool: &SqlitePool) -> Result<Vec<Account>> {
    let rows = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY username"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(account_from_row).collect()
}

pub async fn registration_time(pool: &SqlitePool, username: &str) -> Result<Option<DateTime<Utc>>> {
    let secs: Option<i64> = sqlx::query_scalar("SELECT registered_at FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    secs.map(timestamp).transpose()
}

/// Get an account's password hash, or `None` if there is no such account
pub async fn password_hash(pool: &SqlitePool, username: &str) -> Result<Option<String>> {
    let hash = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(hash)
}

pub async fn set_password_hash(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<()> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE username = ?")
        .bind(password_hash)
        .bind(username)
        .execute(pool)
        .await?;

    ensure_updated(result.rows_affected(), username)
}

/// Whether the account may create share tokens; `false` for unknown accounts
pub async fn allow_share(pool: &SqlitePool, username: &str) -> Result<bool> {
    let allowed: Option<bool> = sqlx::query_scalar("SELECT allow_share FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(allowed.unwrap_or(false))
}

pub async fn set_allow_share(pool: &SqlitePool, username: &str, allow: bool) -> Result<()> {
    let result = sqlx::query("UPDATE users SET allow_share = ? WHERE username = ?")
        .bind(allow)
        .bind(username)
        .execute(pool)
        .await?;

    ensure_updated(result.rows_affected(), username)
}

/// Whether the account is an administrator; `false` for unknown accounts
pub async fn is_admin(pool: &SqlitePool, username: &str) -> Result<bool> {
    let admin: Option<bool> = sqlx::query_scalar("SELECT is_admin FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(admin.unwrap_or(false))
}

pub async fn set_admin(pool: &SqlitePool, username: &str, admin: bool) -> Result<()> {
    let result = sqlx::query("UPDATE users SET is_admin = ? WHERE username = ?")
        .bind(admin)
        .bind(username)
        .execute(pool)
        .await?;

    ensure_updated(result.rows_affected(), username)
}

fn ensure_updated(rows: u64, username: &str) -> Result<()> {
    if rows == 0 {
        return Err(StorageError::not_found("Account", username));
    }
    Ok(())
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::Corrupt(format!("invalid timestamp {secs}")))
}

fn account_from_row(row: &SqliteRow) -> Result<Account> {
    Ok(Account {
        username: row.try_get("username")?,
        allow_share: row.try_get("allow_share")?,
        is_admin: row.try_get("is_admin")?,
        registered_at: timestamp(row.try_get("registered_at")?)?,
    })
}
