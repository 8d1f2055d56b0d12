//! HTTP server wrapper shared by both apps.

use crate::context::AppContext;
use crate::routes;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// One app bound to its context.
pub struct AppServer {
    ctx: AppContext,
    router: Router,
}

impl AppServer {
    /// Merge the app's routes with the shared auth/static routes.
    pub fn new(ctx: AppContext, app_routes: Router<AppContext>) -> Self {
        let router = build_router(ctx.clone(), app_routes);
        Self { ctx, router }
    }

    /// Serve until Ctrl-C, then close the database.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.ctx.config().server.bind.clone();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
        tracing::info!(app = self.ctx.brand().name, address = %addr, "listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.ctx.close().await;
        Ok(())
    }
}

/// The complete router for an app, ready to serve or to drive from tests.
pub fn build_router(ctx: AppContext, app_routes: Router<AppContext>) -> Router {
    routes::shared_router()
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
