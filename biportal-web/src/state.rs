//! Application state shared by every handler

use crate::WebConfig;
use biportal_access::AccessDirectory;
use biportal_embed::TokenBroker;
use std::sync::Arc;

/// Immutable after startup; cloning only bumps reference counts
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Credentials, access policy and page catalog
    pub directory: Arc<AccessDirectory>,
    /// Embed-token broker (the real one, or a fake in tests)
    pub broker: Arc<dyn TokenBroker>,
}

impl AppState {
    pub fn new(config: WebConfig, directory: AccessDirectory, broker: Arc<dyn TokenBroker>) -> Self {
        Self {
            config,
            directory: Arc::new(directory),
            broker,
        }
    }
}
