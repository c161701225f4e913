use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{handler::HandlerWithoutStateExt, routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod cache;
pub mod handlers;
pub mod render;
pub mod state;

pub use cache::ArticleCache;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir)
        .fallback(handlers::static_fallback.into_service());

    Router::new()
        .route("/", get(handlers::index))
        .route("/article/:id", get(handlers::article_detail))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:id", get(handlers::get_article))
        .route("/healthz", get(handlers::healthz))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves `app` on `bind` until Ctrl-C.
pub async fn serve(app: Router, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("📰 newswire listening on http://{}", bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

pub mod prelude {
    pub use crate::AppState;
    pub use nw_core::{Article, Error, Result};
}
