//! # tally-tasks
//!
//! Personal task tracker: each signed-in user keeps a private list of tasks
//! with a title, optional description, deadline and completed flag.

pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
pub mod store;

use tally_core::{
    AppConfig, AppContext, Defaults,
    templates::{Brand, NavLink},
};

pub use models::{Task, TaskFields, TaskForm, TaskId};
pub use routes::create_router;

/// Config table name, fallback bind address and database file.
pub const DEFAULTS: Defaults = Defaults {
    section: "tasks",
    bind: "127.0.0.1:5000",
    database_path: "tasks.db",
};

pub const BRAND: Brand = Brand {
    name: "Tally Tasks",
    icon: "check-square",
    nav: &[
        NavLink {
            label: "Tasks",
            href: "/",
            icon: "list",
        },
        NavLink {
            label: "New task",
            href: "/add_task",
            icon: "plus",
        },
    ],
};

/// `tasks` table, on top of the shared users/sessions tables.
pub const SCHEMA: &str = include_str!("../sql/schema.sql");

/// Open the task database and build the app context.
pub async fn init_context(config: AppConfig) -> anyhow::Result<AppContext> {
    AppContext::init(config, BRAND, SCHEMA).await
}
