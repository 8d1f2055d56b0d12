//! Application configuration.
//!
//! Both apps share one file; each reads its own top-level table
//! (`[tasks.server]`, `[finance.database]`, ...). Values missing from the
//! table fall back to per-app defaults supplied through [`Defaults`].

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, fs, path::Path, path::PathBuf};

/// Env var overriding the config file location.
pub const CONFIG_ENV: &str = "TALLY_CONFIG";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Per-app fallback values.
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    /// Top-level table holding this app's settings, e.g. `tasks`.
    pub section: &'static str,
    pub bind: &'static str,
    pub database_path: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Config with every value taken from `defaults`.
    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            server: ServerConfig {
                bind: defaults.bind.to_string(),
            },
            database: DatabaseConfig {
                path: defaults.database_path.to_string(),
            },
            session: SessionConfig::default(),
        }
    }

    /// Parse the `defaults.section` table of a TOML document, filling blanks
    /// from `defaults`. Other apps' tables are ignored.
    pub fn from_toml(raw: &str, defaults: Defaults) -> anyhow::Result<Self> {
        let mut doc: toml::Table = toml::from_str(raw)?;
        let Some(section) = doc.remove(defaults.section) else {
            return Ok(Self::with_defaults(defaults));
        };
        let mut cfg: AppConfig = section
            .try_into()
            .map_err(|e| anyhow::anyhow!("invalid [{}] config: {e}", defaults.section))?;
        if cfg.server.bind.is_empty() {
            cfg.server.bind = defaults.bind.to_string();
        }
        if cfg.database.path.is_empty() {
            cfg.database.path = defaults.database_path.to_string();
        }
        Ok(cfg)
    }

    /// Render as TOML under `section` (used by `tally config`).
    pub fn to_toml(&self, section: &str) -> anyhow::Result<String> {
        let doc = BTreeMap::from([(section, self)]);
        Ok(toml::to_string_pretty(&doc)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1:5000"
    #[serde(default)]
    pub bind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file. `:memory:` keeps everything in memory.
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Add the `Secure` attribute to the session cookie.
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_name() -> String {
    "tally_session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure: false,
        }
    }
}

/// Load the config for one app.
///
/// An explicit path (argument or `TALLY_CONFIG`) must exist. The default
/// `tally.toml` is optional.
pub fn load_config(explicit: Option<&Path>, defaults: Defaults) -> anyhow::Result<AppConfig> {
    let (path, required) = config_path(explicit);
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::with_defaults(defaults));
    }
    let raw = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
    AppConfig::from_toml(&raw, defaults)
}

fn config_path(explicit: Option<&Path>) -> (PathBuf, bool) {
    if let Some(p) = explicit {
        return (p.to_path_buf(), true);
    }
    if let Ok(p) = env::var(CONFIG_ENV) {
        return (PathBuf::from(p), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_FILE), false)
}
