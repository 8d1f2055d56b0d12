//! Route definitions for the finance tracker.

use axum::{
    Router,
    routing::{get, post},
};
use tally_core::AppContext;

use crate::handlers;

/// Finance routes; merged with the shared auth and static routes by
/// [`tally_core::server::build_router`].
pub fn create_router() -> Router<AppContext> {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/add_transaction",
            get(handlers::add_transaction_page).post(handlers::add_transaction_submit),
        )
        .route("/export", get(handlers::export))
        .route("/import", post(handlers::import))
}
