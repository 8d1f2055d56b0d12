//! Routes every app mounts: auth pages and embedded static assets.

use crate::{assets, auth::handlers, context::AppContext};
use axum::{Router, routing::get};

/// Create the shared router.
pub fn shared_router() -> Router<AppContext> {
    Router::new()
        .route("/register", get(handlers::register_page).post(handlers::register_submit))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/logout", get(handlers::logout))
        .route("/static/{*path}", get(assets::static_asset))
}
