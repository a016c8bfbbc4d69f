//! Unified error handling
//!
//! Structured error types with context, recovery suggestions and error chaining.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type PortalResult<T> = Result<T, PortalError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the portal
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },

    #[error("Upstream authentication failure (status {status})")]
    UpstreamAuth {
        status: u16,
        body: String,
        context: ErrorContext,
    },

    #[error("Upstream embed-token failure (status {status})")]
    UpstreamEmbed {
        status: u16,
        body: String,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl PortalError {
    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            PortalError::Config { context, .. }
            | PortalError::Validation { context, .. }
            | PortalError::Network { context, .. }
            | PortalError::Timeout { context, .. }
            | PortalError::UpstreamAuth { context, .. }
            | PortalError::UpstreamEmbed { context, .. }
            | PortalError::NotFound { context, .. }
            | PortalError::Internal { context, .. } => context,
        }
    }

    /// Whether the failure came from one of the external token services.
    ///
    /// Timeouts and transport errors count: both only happen on outbound calls.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PortalError::UpstreamAuth { .. }
                | PortalError::UpstreamEmbed { .. }
                | PortalError::Network { .. }
                | PortalError::Timeout { .. }
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let context = self.context();
        let error_id = context.error_id.as_str();
        let operation = context.operation.as_deref().unwrap_or_default();
        let suggestions = context.recovery_suggestions.join("; ");
        match self {
            PortalError::UpstreamAuth { status, body, .. }
            | PortalError::UpstreamEmbed { status, body, .. } => {
                error!(
                    error_id = %error_id,
                    operation = %operation,
                    suggestions = %suggestions,
                    upstream_status = status,
                    upstream_body = %body,
                    error = %self,
                    "Upstream token service rejected the request"
                );
            }
            PortalError::Network { .. } | PortalError::Timeout { .. } => {
                warn!(
                    error_id = %error_id,
                    operation = %operation,
                    suggestions = %suggestions,
                    error = %self,
                    "Network or timeout error talking to upstream"
                );
            }
            PortalError::Config { .. } | PortalError::Validation { .. } => {
                error!(
                    error_id = %error_id,
                    operation = %operation,
                    suggestions = %suggestions,
                    error = %self,
                    "Configuration or validation error"
                );
            }
            PortalError::NotFound { .. } => {
                warn!(error_id = %error_id, error = %self, "Resource not found");
            }
            PortalError::Internal { .. } => {
                error!(error_id = %error_id, error = %self, "Internal error");
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::PortalError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::PortalError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}
