//! BI Portal Web Server
//!
//! Login form, role-gated dashboard pages, and the embed-config endpoint the
//! pages call to obtain a report view token.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod templates;

// Re-export main types
pub use server::PortalServer;
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use biportal_core::PortalError;
use serde_json::json;
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let static_dir = state
        .config
        .static_dir
        .clone()
        .unwrap_or_else(|| "static".to_string());

    Router::new()
        .merge(routes::portal_routes())
        .merge(routes::static_routes(&static_dir))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Static files directory
    pub static_dir: Option<String>,
    /// Portal TOML file (users and policy)
    pub config_path: Option<String>,
    /// Re-check the access policy on the embed-config route
    pub enforce_embed_policy: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
            static_dir: None,
            config_path: None,
            enforce_embed_policy: true,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("BIPORTAL_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("BIPORTAL_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8080),
            dev_mode: std::env::var("BIPORTAL_DEV_MODE")
                .ok()
                .and_then(|flag| flag.parse().ok())
                .unwrap_or(false),
            static_dir: std::env::var("BIPORTAL_STATIC_DIR").ok(),
            config_path: std::env::var("BIPORTAL_CONFIG").ok(),
            enforce_embed_policy: true,
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Role '{role}' may not open page '{page}'")]
    Forbidden { role: String, page: String },

    #[error("Page '{0}' not found")]
    PageNotFound(String),

    #[error("Token service failure: {0}")]
    Upstream(#[source] PortalError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<PortalError> for WebError {
    fn from(error: PortalError) -> Self {
        match error {
            PortalError::NotFound { resource, .. } => WebError::PageNotFound(resource),
            PortalError::Config { .. } | PortalError::Validation { .. } => {
                WebError::Config(error.to_string())
            }
            error if error.is_upstream() => WebError::Upstream(error),
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            WebError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                "Login required".to_string(),
            ),
            WebError::Forbidden { page, .. } => (
                StatusCode::FORBIDDEN,
                "permission_denied",
                format!("Access to page '{}' is not allowed", page),
            ),
            WebError::PageNotFound(page) => (
                StatusCode::NOT_FOUND,
                "page_not_found",
                format!("Page '{}' not found", page),
            ),
            // Upstream status and body are logged by the broker, never returned
            WebError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "embed_token_unavailable",
                "Failed to generate embed token".to_string(),
            ),
            WebError::Server(_)
            | WebError::Config(_)
            | WebError::Internal(_)
            | WebError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use biportal_core::ErrorContext;

    #[test]
    fn test_portal_error_mapping() {
        let not_found = PortalError::NotFound {
            resource: "report section for page 'rfv'".to_string(),
            context: ErrorContext::new("page_catalog"),
        };
        assert!(matches!(WebError::from(not_found), WebError::PageNotFound(_)));

        let upstream = PortalError::UpstreamEmbed {
            status: 403,
            body: "secret upstream detail".to_string(),
            context: ErrorContext::new("token_broker"),
        };
        let response = WebError::from(upstream).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout = PortalError::Timeout {
            operation: "generate_embed_token".to_string(),
            duration_ms: 30_000,
            context: ErrorContext::new("token_broker"),
        };
        assert!(matches!(WebError::from(timeout), WebError::Upstream(_)));

        let internal = PortalError::Internal {
            message: "client build failed".to_string(),
            source: None,
            context: ErrorContext::new("http_client"),
        };
        assert!(matches!(WebError::from(internal), WebError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebError::Forbidden {
                role: "limited".to_string(),
                page: "mapa".to_string()
            }
            .into_response()
            .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            WebError::PageNotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_config_address() {
        let config = WebConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..WebConfig::default()
        };
        assert_eq!(config.address(), "0.0.0.0:3000");
        assert!(config.enforce_embed_policy);
    }
}
