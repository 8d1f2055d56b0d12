//! # tally-finance
//!
//! Personal finance tracker: signed-in users record income and expenses,
//! see their balance with a running-balance line chart and an expense
//! breakdown pie, and move their data in and out as `.xlsx` spreadsheets.
//!
//! - `models`: transaction rows and the add form
//! - `store`: per-user queries
//! - `report`: totals, running balance and chart data
//! - `spreadsheet`: `.xlsx` export and import

pub mod handlers;
pub mod models;
pub mod pages;
pub mod report;
pub mod routes;
pub mod spreadsheet;
pub mod store;

use tally_core::{
    AppConfig, AppContext, Defaults,
    templates::{Brand, NavLink},
};

pub use models::{NewTransaction, Transaction, TransactionForm, TransactionKind};
pub use report::{Chart, ChartKind, Summary};
pub use routes::create_router;

/// Config table name, fallback bind address and database file.
pub const DEFAULTS: Defaults = Defaults {
    section: "finance",
    bind: "127.0.0.1:5001",
    database_path: "finances.db",
};

pub const BRAND: Brand = Brand {
    name: "Tally Finance",
    icon: "wallet",
    nav: &[
        NavLink {
            label: "Dashboard",
            href: "/",
            icon: "chart-line",
        },
        NavLink {
            label: "Add transaction",
            href: "/add_transaction",
            icon: "plus",
        },
        NavLink {
            label: "Export",
            href: "/export",
            icon: "file-excel",
        },
    ],
};

/// `transactions` table, on top of the shared users/sessions tables.
pub const SCHEMA: &str = include_str!("../sql/schema.sql");

/// Open the finance database and build the app context.
pub async fn init_context(config: AppConfig) -> anyhow::Result<AppContext> {
    AppContext::init(config, BRAND, SCHEMA).await
}
