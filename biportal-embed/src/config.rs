//! Broker configuration
//!
//! Identifiers and the client secret come from the environment. Only the
//! variable name is ever reported when one is missing.

use biportal_core::{ErrorContext, PortalError, PortalResult};

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_API_BASE: &str = "https://api.powerbi.com/v1.0/myorg";
pub const DEFAULT_EMBED_HOST: &str = "https://app.powerbi.com";
pub const DEFAULT_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Report embedded on every portal page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTarget {
    /// Workspace (group) holding the report
    pub group_id: String,
    pub report_id: String,
    /// Dataset behind the report, used for refresh lookups
    pub dataset_id: Option<String>,
}

/// Everything the broker needs to talk to both token services
#[derive(Clone)]
pub struct BrokerConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub target: ReportTarget,
    pub authority_host: String,
    pub api_base: String,
    pub embed_host: String,
    pub scope: String,
    /// Bound on every outbound call
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("target", &self.target)
            .field("authority_host", &self.authority_host)
            .field("api_base", &self.api_base)
            .field("embed_host", &self.embed_host)
            .field("scope", &self.scope)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl BrokerConfig {
    /// Config with default endpoints
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        target: ReportTarget,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            target,
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            embed_host: DEFAULT_EMBED_HOST.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("biportal/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> PortalResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> PortalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            present(name).ok_or_else(|| PortalError::Config {
                message: format!("Missing required environment variable {}", name),
                source: None,
                context: ErrorContext::new("broker_config")
                    .with_operation("from_env")
                    .with_suggestion("Set it in the environment or in a .env file"),
            })
        };

        let target = ReportTarget {
            group_id: required("GROUP_ID")?,
            report_id: required("REPORT_ID")?,
            dataset_id: present("DATASET_ID"),
        };
        let mut config = Self::new(
            required("TENANT_ID")?,
            required("CLIENT_ID")?,
            required("CLIENT_SECRET")?,
            target,
        );

        if let Some(host) = present("BIPORTAL_AUTHORITY_HOST") {
            config.authority_host = host;
        }
        if let Some(base) = present("BIPORTAL_API_BASE") {
            config.api_base = base;
        }
        if let Some(host) = present("BIPORTAL_EMBED_HOST") {
            config.embed_host = host;
        }
        if let Some(timeout) = present("BIPORTAL_HTTP_TIMEOUT_SECS") {
            config.timeout_seconds = timeout.parse().map_err(|e| PortalError::Config {
                message: format!("BIPORTAL_HTTP_TIMEOUT_SECS is not a number: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("broker_config").with_operation("from_env"),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check endpoint URLs and the timeout
    pub fn validate(&self) -> PortalResult<()> {
        for (name, value) in [
            ("authority_host", &self.authority_host),
            ("api_base", &self.api_base),
            ("embed_host", &self.embed_host),
        ] {
            url::Url::parse(value).map_err(|e| PortalError::Config {
                message: format!("{} is not a valid URL: {}", name, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("broker_config").with_operation("validate"),
            })?;
        }

        if self.timeout_seconds == 0 {
            return Err(PortalError::Config {
                message: "HTTP timeout must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("broker_config")
                    .with_operation("validate")
                    .with_suggestion("Set BIPORTAL_HTTP_TIMEOUT_SECS to a positive value"),
            });
        }

        Ok(())
    }

    /// Tenant-scoped token endpoint of the identity provider
    pub fn authority_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }

    /// Embed-token endpoint for the configured report
    pub fn generate_token_url(&self) -> String {
        format!(
            "{}/groups/{}/reports/{}/GenerateToken",
            self.api_base.trim_end_matches('/'),
            self.target.group_id,
            self.target.report_id
        )
    }

    /// Refresh history endpoint, when a dataset is configured
    pub fn refreshes_url(&self) -> Option<String> {
        self.target.dataset_id.as_ref().map(|dataset_id| {
            format!(
                "{}/groups/{}/datasets/{}/refreshes?$top=10",
                self.api_base.trim_end_matches('/'),
                self.target.group_id,
                dataset_id
            )
        })
    }

    /// URL the browser SDK loads the report from
    pub fn embed_url(&self) -> String {
        format!(
            "{}/reportEmbed?reportId={}&groupId={}",
            self.embed_host.trim_end_matches('/'),
            self.target.report_id,
            self.target.group_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 5] = [
        ("TENANT_ID", "tenant-1"),
        ("CLIENT_ID", "client-1"),
        ("CLIENT_SECRET", "s3cret"),
        ("GROUP_ID", "group-1"),
        ("REPORT_ID", "report-1"),
    ];

    #[test]
    fn test_from_lookup_defaults() {
        let config = BrokerConfig::from_lookup(env(&REQUIRED)).unwrap();
        assert_eq!(
            config.authority_url(),
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
        assert_eq!(
            config.generate_token_url(),
            "https://api.powerbi.com/v1.0/myorg/groups/group-1/reports/report-1/GenerateToken"
        );
        assert_eq!(
            config.embed_url(),
            "https://app.powerbi.com/reportEmbed?reportId=report-1&groupId=group-1"
        );
        assert_eq!(config.refreshes_url(), None);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATASET_ID", "dataset-9"));
        pairs.push(("BIPORTAL_API_BASE", "http://127.0.0.1:9000/"));
        pairs.push(("BIPORTAL_HTTP_TIMEOUT_SECS", "5"));
        let config = BrokerConfig::from_lookup(env(&pairs)).unwrap();

        assert_eq!(
            config.refreshes_url().unwrap(),
            "http://127.0.0.1:9000/groups/group-1/datasets/dataset-9/refreshes?$top=10"
        );
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_missing_variable_names_it_without_values() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "CLIENT_SECRET")
            .collect();
        let err = BrokerConfig::from_lookup(env(&pairs)).unwrap_err();
        assert!(err.to_string().contains("CLIENT_SECRET"));

        let blank: Vec<_> = REQUIRED
            .iter()
            .map(|(k, v)| if *k == "TENANT_ID" { (*k, "  ") } else { (*k, *v) })
            .collect();
        assert!(BrokerConfig::from_lookup(env(&blank)).is_err());
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BIPORTAL_HTTP_TIMEOUT_SECS", "0"));
        assert!(BrokerConfig::from_lookup(env(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BIPORTAL_AUTHORITY_HOST", "not a url"));
        assert!(BrokerConfig::from_lookup(env(&pairs)).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = BrokerConfig::from_lookup(env(&REQUIRED)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
