//! Server-side sessions.
//!
//! The browser holds an opaque random token in a cookie; the `sessions` table
//! maps it to a user id and an optional pending flash message. Handlers take a
//! [`Session`] extractor, which is the request-scoped view of that row.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::UserId;
use crate::config::SessionConfig;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// Sessions older than this are rejected and pruned on the next login.
pub const SESSION_MAX_AGE_DAYS: i64 = 30;

/// Request-scoped session context.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    user_id: Option<UserId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The logged-in user, or [`AppError::LoginRequired`].
    pub fn require_user(&self) -> AppResult<UserId> {
        self.user_id.ok_or(AppError::LoginRequired)
    }

    /// Queue a one-shot message for the next rendered page.
    pub async fn set_flash(&self, pool: &SqlitePool, message: &str) -> AppResult<()> {
        if let Some(token) = &self.token {
            sqlx::query("UPDATE sessions SET flash = ? WHERE token = ?")
                .bind(message)
                .bind(token)
                .execute(pool)
                .await?;
        }
        Ok(())
    }

    /// Pop the pending message, if any.
    pub async fn take_flash(&self, pool: &SqlitePool) -> AppResult<Option<String>> {
        let Some(token) = &self.token else {
            return Ok(None);
        };
        let flash: Option<(Option<String>,)> =
            sqlx::query_as("SELECT flash FROM sessions WHERE token = ?")
                .bind(token)
                .fetch_optional(pool)
                .await?;
        let message = flash.and_then(|(m,)| m);
        if message.is_some() {
            sqlx::query("UPDATE sessions SET flash = NULL WHERE token = ?")
                .bind(token)
                .execute(pool)
                .await?;
        }
        Ok(message)
    }
}

impl<S> FromRequestParts<S> for Session
where
    AppContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AppContext::from_ref(state);
        let cookie_name = &ctx.config().session.cookie_name;

        let Some(token) = extract_session_cookie(&parts.headers, cookie_name) else {
            return Ok(Session::anonymous());
        };

        match lookup(ctx.pool(), &token).await? {
            Some(user_id) => Ok(Session {
                token: Some(token),
                user_id: Some(user_id),
            }),
            None => Ok(Session::anonymous()),
        }
    }
}

/// Fail with [`AppError::Forbidden`] unless the record belongs to the session user.
pub fn ensure_owner(owner: UserId, session_user: UserId) -> AppResult<()> {
    if owner != session_user {
        tracing::warn!(owner, session_user, "ownership check failed");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Start a session for `user_id` and return its token.
///
/// Expired sessions of every user are deleted first.
pub async fn create(pool: &SqlitePool, user_id: UserId) -> AppResult<String> {
    let pruned = sqlx::query("DELETE FROM sessions WHERE created_at < ?")
        .bind(expiry_cutoff())
        .execute(pool)
        .await?
        .rows_affected();
    if pruned > 0 {
        tracing::debug!(pruned, "removed expired sessions");
    }

    let token = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(timestamp(Utc::now()))
        .execute(pool)
        .await?;
    Ok(token)
}

/// Resolve a live token to its user.
pub async fn lookup(pool: &SqlitePool, token: &str) -> AppResult<Option<UserId>> {
    let row: Option<(UserId,)> =
        sqlx::query_as("SELECT user_id FROM sessions WHERE token = ? AND created_at >= ?")
            .bind(token)
            .bind(expiry_cutoff())
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(id,)| id))
}

/// Fixed-width UTC timestamps so `created_at` compares correctly as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn expiry_cutoff() -> String {
    timestamp(Utc::now() - Duration::days(SESSION_MAX_AGE_DAYS))
}

/// End a session.
pub async fn destroy(pool: &SqlitePool, token: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Extract session cookie value from the cookie header
pub fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(&prefix))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value carrying a new session token.
pub fn session_cookie(cfg: &SessionConfig, token: &str) -> String {
    let secure = if cfg.secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax{}",
        cfg.cookie_name, token, secure
    )
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_cookie(cfg: &SessionConfig) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", cfg.cookie_name)
}
