//! Integration test helpers
//!
//! Spawns the full portal on an ephemeral port with a fake token broker.

#![allow(dead_code)]

use async_trait::async_trait;
use biportal_access::AccessDirectory;
use biportal_core::{ErrorContext, PortalConfig, PortalError, PortalResult};
use biportal_embed::{EmbedToken, LastRefresh, TokenBroker};
use biportal_web::{AppState, WebConfig};
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use tokio::net::TcpListener;

// Initialise tracing only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Broker that answers from memory and counts calls
#[derive(Default)]
pub struct FakeBroker {
    pub fail: bool,
    pub token_calls: AtomicUsize,
}

#[async_trait]
impl TokenBroker for FakeBroker {
    async fn generate_embed_token(&self) -> PortalResult<EmbedToken> {
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(PortalError::UpstreamAuth {
                status: 401,
                body: "AADSTS7000215: Invalid client secret".to_string(),
                context: ErrorContext::new("fake_broker"),
            });
        }
        Ok(EmbedToken {
            token: format!("embed-token-{}", n),
            token_id: None,
            expiration: None,
        })
    }

    async fn last_refresh(&self) -> LastRefresh {
        Utc.with_ymd_and_hms(2026, 10, 18, 5, 45, 0)
            .single()
            .map(LastRefresh::At)
            .unwrap_or(LastRefresh::Unknown)
    }

    fn report_id(&self) -> &str {
        "report-1"
    }

    fn embed_url(&self) -> String {
        "https://app.powerbi.com/reportEmbed?reportId=report-1&groupId=group-1".to_string()
    }

    fn tracks_refresh(&self) -> bool {
        true
    }
}

/// Test application instance
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub broker: Arc<FakeBroker>,
}

impl TestApp {
    /// Submit the login form
    pub async fn post_login(&self, username: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/login", &self.address))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_embed_config(&self, page_key: &str) -> reqwest::Response {
        self.get(&format!("/get_embed_config/{}", page_key)).await
    }
}

/// Spawn the portal with the built-in users and policy
pub async fn spawn_app() -> TestApp {
    spawn_app_with(PortalConfig::default(), FakeBroker::default()).await
}

/// Spawn the portal with a given portal file and broker
pub async fn spawn_app_with(portal_config: PortalConfig, broker: FakeBroker) -> TestApp {
    LazyLock::force(&TRACING);

    let config = WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        dev_mode: true,
        static_dir: Some("static".to_string()),
        config_path: None,
        enforce_embed_policy: portal_config.embed.enforce_access_policy,
    };

    let directory = AccessDirectory::from_config(&portal_config).unwrap();
    let broker = Arc::new(broker);
    let state = AppState::new(config, directory, broker.clone());
    let app = biportal_web::create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: client,
        broker,
    }
}

/// Location header of a redirect response
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
