//! Application context shared by every handler.

use crate::config::AppConfig;
use crate::db;
use crate::templates::Brand;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Explicitly constructed application context.
///
/// Built once by [`AppContext::init`] and handed to the router as state.
/// Cloning is cheap.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<AppContextInner>,
}

struct AppContextInner {
    config: AppConfig,
    pool: SqlitePool,
    brand: Brand,
}

impl AppContext {
    /// Open the database and create any missing tables.
    pub async fn init(config: AppConfig, brand: Brand, app_schema: &str) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database, app_schema).await?;
        tracing::info!(
            app = brand.name,
            database = %config.database.path,
            "database ready"
        );
        Ok(Self::from_parts(config, pool, brand))
    }

    /// Wrap an already prepared pool.
    pub fn from_parts(config: AppConfig, pool: SqlitePool, brand: Brand) -> Self {
        Self {
            inner: Arc::new(AppContextInner { config, pool, brand }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn brand(&self) -> &Brand {
        &self.inner.brand
    }

    /// Close the connection pool. Pending queries finish first.
    pub async fn close(&self) {
        self.inner.pool.close().await;
        tracing::info!(app = self.inner.brand.name, "database closed");
    }
}
