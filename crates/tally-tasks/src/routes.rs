//! Route definitions for the task tracker.

use crate::handlers;
use axum::{Router, routing::get};
use tally_core::AppContext;

/// Create the task router. Auth and static routes are added by
/// [`tally_core::server::build_router`].
pub fn create_router() -> Router<AppContext> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add_task", get(handlers::add_task_page).post(handlers::add_task_submit))
        .route(
            "/edit_task/{id}",
            get(handlers::edit_task_page).post(handlers::edit_task_submit),
        )
        .route("/delete_task/{id}", get(handlers::delete_task))
}
