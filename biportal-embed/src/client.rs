//! HTTP client plumbing shared by the broker calls

use crate::config::BrokerConfig;
use biportal_core::{ErrorContext, PortalError, PortalResult};
use std::time::Duration;

/// Create the outbound HTTP client with the configured timeout
pub(crate) fn create_http_client(config: &BrokerConfig) -> PortalResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            PortalError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| PortalError::Internal {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })
}

/// Map a transport failure to `Timeout` or `Network`
pub(crate) fn transport_error(
    error: reqwest::Error,
    operation: &str,
    timeout_seconds: u64,
) -> PortalError {
    if error.is_timeout() {
        PortalError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout_seconds.saturating_mul(1000),
            context: ErrorContext::new("token_broker").with_operation(operation),
        }
    } else {
        PortalError::Network {
            message: format!("Request failed: {}", error),
            source: Some(Box::new(error)),
            context: ErrorContext::new("token_broker")
                .with_operation(operation)
                .with_suggestion("Check network connectivity to the token services"),
        }
    }
}

/// Read status and body of a rejected response
pub(crate) async fn rejected_response(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}
