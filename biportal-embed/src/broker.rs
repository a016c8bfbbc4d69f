//! Two-step token exchange
//!
//! 1. Client-credentials grant against the identity provider.
//! 2. `GenerateToken` (access level `view`) against the reporting platform.
//!
//! The access token is not cached: every embed token starts from a fresh
//! client-credentials grant. No retries.

use crate::client::{create_http_client, rejected_response, transport_error};
use crate::config::BrokerConfig;
use crate::types::{
    AccessTokenResponse, EmbedToken, GenerateTokenRequest, GenerateTokenResponse, LastRefresh,
    RefreshHistory,
};
use async_trait::async_trait;
use biportal_core::{ErrorContext, PortalError, PortalResult};
use tracing::{debug, info, warn};

/// Mints report view tokens for the browser
#[async_trait]
pub trait TokenBroker: Send + Sync {
    /// Fresh embed token for the configured report
    async fn generate_embed_token(&self) -> PortalResult<EmbedToken>;

    /// Best effort; every failure collapses to [`LastRefresh::Unknown`]
    async fn last_refresh(&self) -> LastRefresh;

    fn report_id(&self) -> &str;

    fn embed_url(&self) -> String;

    /// Whether a dataset is configured for refresh lookups
    fn tracks_refresh(&self) -> bool;
}

/// Broker backed by Microsoft Entra ID and the Power BI REST API
pub struct PowerBiBroker {
    client: reqwest::Client,
    config: BrokerConfig,
}

impl PowerBiBroker {
    pub fn new(config: BrokerConfig) -> PortalResult<Self> {
        config.validate()?;
        let client = create_http_client(&config)?;

        info!(
            report_id = %config.target.report_id,
            group_id = %config.target.group_id,
            "Created embed token broker"
        );

        Ok(Self { client, config })
    }

    /// Step 1: client-credentials grant
    pub async fn acquire_access_token(&self) -> PortalResult<String> {
        let operation = "acquire_access_token";
        debug!("Requesting access token from {}", self.config.authority_url());

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
        ];

        let response = self
            .client
            .post(self.config.authority_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(e, operation, self.config.timeout_seconds))
            .inspect_err(PortalError::log)?;

        if !response.status().is_success() {
            let (status, body) = rejected_response(response).await;
            let error = PortalError::UpstreamAuth {
                status,
                body,
                context: ErrorContext::new("token_broker")
                    .with_operation(operation)
                    .with_suggestion("Check TENANT_ID, CLIENT_ID and CLIENT_SECRET"),
            };
            error.log();
            return Err(error);
        }

        let status = response.status().as_u16();
        let payload: AccessTokenResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e, operation, self.config.timeout_seconds)
            } else {
                PortalError::UpstreamAuth {
                    status,
                    body: format!("unreadable token response: {}", e),
                    context: ErrorContext::new("token_broker").with_operation(operation),
                }
            }
        })?;

        Ok(payload.access_token)
    }

    pub(crate) async fn fetch_refresh_history(&self, url: &str) -> PortalResult<RefreshHistory> {
        let operation = "last_refresh";
        let access_token = self.acquire_access_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(e, operation, self.config.timeout_seconds))?;

        if !response.status().is_success() {
            let (status, body) = rejected_response(response).await;
            return Err(PortalError::UpstreamEmbed {
                status,
                body,
                context: ErrorContext::new("token_broker").with_operation(operation),
            });
        }

        let status = response.status().as_u16();
        response.json::<RefreshHistory>().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e, operation, self.config.timeout_seconds)
            } else {
                PortalError::UpstreamEmbed {
                    status,
                    body: format!("unreadable refresh history: {}", e),
                    context: ErrorContext::new("token_broker").with_operation(operation),
                }
            }
        })
    }
}

#[async_trait]
impl TokenBroker for PowerBiBroker {
    async fn generate_embed_token(&self) -> PortalResult<EmbedToken> {
        let operation = "generate_embed_token";
        let access_token = self.acquire_access_token().await?;

        let response = self
            .client
            .post(self.config.generate_token_url())
            .bearer_auth(access_token)
            .json(&GenerateTokenRequest {
                access_level: "view",
            })
            .send()
            .await
            .map_err(|e| transport_error(e, operation, self.config.timeout_seconds))
            .inspect_err(PortalError::log)?;

        if !response.status().is_success() {
            let (status, body) = rejected_response(response).await;
            let error = PortalError::UpstreamEmbed {
                status,
                body,
                context: ErrorContext::new("token_broker")
                    .with_operation(operation)
                    .with_suggestion(match status {
                        401 | 403 => "Check that the service principal can access the workspace",
                        404 => "Check GROUP_ID and REPORT_ID",
                        _ => "Check the reporting platform status",
                    }),
            };
            error.log();
            return Err(error);
        }

        let status = response.status().as_u16();
        let payload: GenerateTokenResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e, operation, self.config.timeout_seconds)
            } else {
                PortalError::UpstreamEmbed {
                    status,
                    body: format!("unreadable embed token response: {}", e),
                    context: ErrorContext::new("token_broker").with_operation(operation),
                }
            }
        })?;

        debug!("Embed token issued for report {}", self.config.target.report_id);
        Ok(payload.into_embed_token())
    }

    async fn last_refresh(&self) -> LastRefresh {
        let Some(url) = self.config.refreshes_url() else {
            return LastRefresh::Unknown;
        };

        match self.fetch_refresh_history(&url).await {
            Ok(history) => history.latest_completed(),
            Err(e) => {
                warn!(error = %e, "Dataset refresh lookup failed");
                LastRefresh::Unknown
            }
        }
    }

    fn report_id(&self) -> &str {
        &self.config.target.report_id
    }

    fn embed_url(&self) -> String {
        self.config.embed_url()
    }

    fn tracks_refresh(&self) -> bool {
        self.config.target.dataset_id.is_some()
    }
}
