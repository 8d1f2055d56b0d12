//! SQLite connection handling and schema bootstrap.

use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{fs, path::Path, str::FromStr};

/// Users and sessions, needed by every app.
pub const AUTH_SCHEMA: &str = include_str!("../sql/auth.sql");

/// Open the pool described by `cfg` and create any missing tables.
///
/// `app_schema` holds the app's own `CREATE TABLE IF NOT EXISTS` script and
/// runs after [`AUTH_SCHEMA`].
pub async fn connect(cfg: &DatabaseConfig, app_schema: &str) -> anyhow::Result<SqlitePool> {
    let pool = if cfg.is_in_memory() {
        memory_pool().await?
    } else {
        ensure_parent_dir(&cfg.path)?;
        let options = SqliteConnectOptions::from_str(&sqlite_url(&cfg.path))?
            .create_if_missing(true)
            .foreign_keys(true);
        SqlitePoolOptions::new().connect_with(options).await?
    };

    init_schema(&pool, app_schema).await?;
    Ok(pool)
}

/// Create the tables if they don't exist.
pub async fn init_schema(pool: &SqlitePool, app_schema: &str) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(AUTH_SCHEMA).execute(pool).await?;
    if !app_schema.trim().is_empty() {
        sqlx::raw_sql(app_schema).execute(pool).await?;
    }
    Ok(())
}

/// A single-connection in-memory pool. Every connection to `:memory:` is its
/// own database, so the pool must never open a second one.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

fn sqlite_url(path: &str) -> String {
    // sqlx sqlite URL format: sqlite://relative/path.db (or sqlite:/abs/path.db)
    if Path::new(path).is_absolute() {
        format!("sqlite:{}", path)
    } else {
        format!("sqlite://{}", path)
    }
}

fn ensure_parent_dir(file_path: &str) -> anyhow::Result<()> {
    let p = Path::new(file_path);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
