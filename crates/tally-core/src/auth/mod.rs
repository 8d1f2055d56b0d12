//! User registration and credential checks.

pub mod handlers;
mod models;
mod password;

pub use models::{User, UserId};
pub use password::{hash_password, verify_password};

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 80;

/// Create a user with a salted password hash.
///
/// Fails with [`AppError::Conflict`] if the username is taken.
pub async fn register(pool: &SqlitePool, username: &str, raw_password: &str) -> AppResult<UserId> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if raw_password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    if find_by_username(pool, username).await?.is_some() {
        return Err(AppError::Conflict(format!("username '{username}' is taken")));
    }

    let hash = hash_password(raw_password)?;
    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(hash)
        .execute(pool)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("username '{username}' is taken"))
            }
            other => AppError::Database(other),
        })?;

    let id = result.last_insert_rowid();
    tracing::info!(user_id = id, username, "registered user");
    Ok(id)
}

/// Look up `username` and check the password. `None` covers both an unknown
/// user and a wrong password.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    raw_password: &str,
) -> AppResult<Option<User>> {
    let Some(user) = find_by_username(pool, username.trim()).await? else {
        return Ok(None);
    };
    if verify_password(raw_password, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}
