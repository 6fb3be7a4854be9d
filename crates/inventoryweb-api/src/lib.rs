//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: the inventory page, its refresh action and the JSON state API

pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use inventoryweb_config::Config;
use inventoryweb_core::Dashboard;
use inventoryweb_utils::escape_html;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::dashboard::{api_refresh, api_state, htmx_dashboard_refresh, htmx_dashboard_view, page_dashboard};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/state", get(api_state))
        .route("/api/refresh", post(api_refresh))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/dashboard", get(page_dashboard))
        // HTMX partial routes
        .route("/dashboard/view", get(htmx_dashboard_view))
        .route("/dashboard/refresh", post(htmx_dashboard_refresh))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body>
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        inner_content.to_string()
    } else {
        base_html(title, inner_content)
    }
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until `shutdown` resolves.
pub async fn start_server(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let endpoint = state.dashboard.endpoint().to_string();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting inventoryweb server on http://{}", addr);
    log::info!("Inventory endpoint: {}", endpoint);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /dashboard/refresh, /dashboard/view (HTMX partials)");
    log::info!("  - /api/state, /api/refresh, /api/health (JSON API)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("Server stopped gracefully");
    Ok(())
}
