//! Route definitions for the portal

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

/// Login, dashboard, report pages and the embed-config endpoint
pub fn portal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::login_page))
        .route("/login", post(handlers::login_submit))
        .route("/logout", get(handlers::logout))
        .route("/dashboard", get(handlers::dashboard))
        .route("/pagina/{page_key}", get(handlers::report_page))
        .route(
            "/get_embed_config/{page_key}",
            get(handlers::get_embed_config),
        )
        .route("/health", get(handlers::health_check))
}

/// Create static file routes
pub fn static_routes(static_dir: &str) -> Router<AppState> {
    Router::new().nest_service("/static", ServeDir::new(static_dir))
}
