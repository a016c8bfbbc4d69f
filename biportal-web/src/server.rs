//! BI Portal Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use biportal_access::AccessDirectory;
use biportal_core::PortalConfig;
use biportal_embed::{BrokerConfig, PowerBiBroker, TokenBroker};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main portal server
pub struct PortalServer {
    config: WebConfig,
    state: AppState,
}

impl PortalServer {
    /// Create a server from an already assembled state
    pub fn new(state: AppState) -> Self {
        Self {
            config: state.config.clone(),
            state,
        }
    }

    /// Start the web server and run until Ctrl+C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting BI portal web server");
        info!("Server address: http://{}", address);
        info!("Development mode: {}", self.config.dev_mode);
        if !self.config.enforce_embed_policy {
            warn!("Embed config route does not check the access policy");
        }

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Builder for PortalServer
pub struct PortalServerBuilder {
    config: WebConfig,
    portal_config: Option<PortalConfig>,
    broker: Option<Arc<dyn TokenBroker>>,
}

impl PortalServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
            portal_config: None,
            broker: None,
        }
    }

    /// Start from an existing configuration
    pub fn with_config(config: WebConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Set static files directory
    pub fn static_dir<S: Into<String>>(mut self, static_dir: S) -> Self {
        self.config.static_dir = Some(static_dir.into());
        self
    }

    /// Set the portal TOML file
    pub fn config_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.config_path = Some(path.into());
        self
    }

    /// Use an already loaded portal configuration instead of reading a file
    pub fn portal_config(mut self, portal_config: PortalConfig) -> Self {
        self.portal_config = Some(portal_config);
        self
    }

    /// Use this broker instead of one built from the environment
    pub fn broker(mut self, broker: Arc<dyn TokenBroker>) -> Self {
        self.broker = Some(broker);
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<PortalServer> {
        let portal_config = match (self.portal_config, &self.config.config_path) {
            (Some(portal_config), _) => portal_config,
            (None, Some(path)) => PortalConfig::from_file(path)?,
            (None, None) => PortalConfig::default(),
        };

        let mut config = self.config;
        config.enforce_embed_policy = portal_config.embed.enforce_access_policy;

        let directory = AccessDirectory::from_config(&portal_config)?;

        let broker = match self.broker {
            Some(broker) => broker,
            None => {
                let broker_config = BrokerConfig::from_env()?;
                Arc::new(PowerBiBroker::new(broker_config)?) as Arc<dyn TokenBroker>
            }
        };

        Ok(PortalServer::new(AppState::new(config, directory, broker)))
    }
}

impl Default for PortalServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
