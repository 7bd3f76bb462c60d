//! # Preview HTTP Service
//!
//! Stateless JSON endpoints over the field resolver, QR styler and canvas
//! renderer, plus a PNG preview that downloads remote images before
//! rasterizing.
//!
//! ## Usage
//!
//! ```bash
//! cardsmith serve --listen 0.0.0.0:8080 --font fonts/NotoSansThai.ttf
//! ```

mod handlers;
mod state;

pub use state::{AppState, CACHE_EXPIRATION_SECS, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::error::CardsmithError;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Catalogs
        .route("/api/fields", get(handlers::catalog::fields))
        .route("/api/elements", get(handlers::catalog::elements))
        .route("/api/qr-styles", get(handlers::catalog::qr_styles))
        // Pure functions
        .route("/api/resolve", post(handlers::resolve::resolve_field))
        .route("/api/qr-style", post(handlers::resolve::qr_style))
        .route("/api/edit", post(handlers::resolve::edit))
        // Rendering
        .route("/api/render", post(handlers::preview::render))
        .route("/api/preview", post(handlers::preview::preview))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use cardsmith::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), cardsmith::CardsmithError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CardsmithError> {
    let app_state = Arc::new(AppState::new(config.clone())?);

    tokio::spawn(cleanup_cache(app_state.clone()));

    let app = router(app_state);

    tracing::info!(
        listen = %config.listen_addr,
        font = ?config.font_path,
        fetch_timeout_secs = config.fetch_timeout_secs,
        "cardsmith preview server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| CardsmithError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| CardsmithError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to evict stale downloads.
async fn cleanup_cache(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(CACHE_EXPIRATION_SECS);

    loop {
        interval.tick().await;
        let removed = state.fetcher.evict_expired(expiration).await;
        if removed > 0 {
            let remaining = state.fetcher.cached().await;
            tracing::info!(removed, remaining, "evicted expired images");
        }
    }
}
