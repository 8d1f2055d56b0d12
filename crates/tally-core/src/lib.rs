//! # tally-core
//!
//! Shared plumbing for the Tally web apps (task tracker and finance tracker):
//! - configuration loading (`config`)
//! - SQLite pool and schema bootstrap (`db`)
//! - the explicit [`AppContext`] handed to every handler
//! - user registration, password hashing and login pages (`auth`)
//! - server-side sessions with flash messages (`session`)
//! - HTML layout helpers (`templates`)
//!
//! ## Tech Stack
//!
//! - Axum for HTTP
//! - sqlx + SQLite for storage
//! - Argon2 for password hashes
//! - Static assets bundled via `rust-embed`

pub mod assets;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod forms;
pub mod routes;
pub mod server;
pub mod session;
pub mod templates;

pub use auth::UserId;
pub use config::{AppConfig, Defaults};
pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use session::Session;
