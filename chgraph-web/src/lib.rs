//! HTTP surface for chgraph.
//!
//! Serves the browser front-end and exposes the submit/click routes of an
//! [`Explorer`] as JSON over an axum [`Router`].

pub mod config;
pub mod error;
pub mod handlers;

pub use config::{DEFAULT_CONFIG_PATH, ServerConfig, load_server_config};
pub use error::ApiError;

use axum::{Router, routing::get};
use chgraph_core::{Explorer, PageFetcher};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;

/// Shared state threaded through all handlers.
pub struct AppState<F> {
    pub explorer: Arc<Explorer<F>>,
    /// Signalled by `/close`.
    pub shutdown: Arc<Notify>,
}

impl<F> AppState<F> {
    pub fn new(explorer: Explorer<F>) -> Self {
        Self {
            explorer: Arc::new(explorer),
            shutdown: Arc::new(Notify::new()),
        }
    }
}

// Derived Clone would require `F: Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            explorer: Arc::clone(&self.explorer),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

/// Build the router for the graph explorer.
pub fn router<F: PageFetcher + 'static>(state: AppState<F>) -> Router {
    use handlers::*;

    Router::new()
        .route("/", get(index))
        .route("/app.js", get(app_js))
        .route(
            "/new-url-submit/",
            get(new_url_submit::<F>).post(new_url_submit::<F>),
        )
        .route(
            "/node-click-submit/",
            get(node_click_submit::<F>).post(node_click_submit::<F>),
        )
        .route("/graph", get(graph::<F>))
        .route("/close", get(close::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `/close` is requested or the process receives Ctrl-C.
pub async fn serve<F: PageFetcher + 'static>(
    listener: TcpListener,
    state: AppState<F>,
) -> std::io::Result<()> {
    let shutdown = Arc::clone(&state.shutdown);
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown.notified() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            tracing::info!("Server closed");
        })
        .await
}
