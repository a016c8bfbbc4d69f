//! Broker data types and upstream wire formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived credential the browser uses to render the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedToken {
    pub token: String,
    pub token_id: Option<String>,
    pub expiration: Option<DateTime<Utc>>,
}

/// Most recent completed dataset refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastRefresh {
    At(DateTime<Utc>),
    Unknown,
}

impl std::fmt::Display for LastRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LastRefresh::At(at) => write!(f, "{}", at.format("%d/%m/%Y %H:%M UTC")),
            LastRefresh::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for LastRefresh {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identity provider token response
#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenResponse {
    pub access_token: String,
}

/// Reporting platform `GenerateToken` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateTokenRequest<'a> {
    pub access_level: &'a str,
}

/// Reporting platform `GenerateToken` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateTokenResponse {
    pub token: String,
    pub token_id: Option<String>,
    /// Kept as text; an unparseable expiry must not fail the exchange
    pub expiration: Option<String>,
}

impl GenerateTokenResponse {
    pub fn into_embed_token(self) -> EmbedToken {
        EmbedToken {
            expiration: self
                .expiration
                .as_deref()
                .and_then(|raw| raw.parse::<DateTime<Utc>>().ok()),
            token: self.token,
            token_id: self.token_id,
        }
    }
}

/// Dataset refresh history
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshHistory {
    #[serde(default)]
    pub value: Vec<RefreshEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshEntry {
    pub status: String,
    pub end_time: Option<DateTime<Utc>>,
}

impl RefreshHistory {
    /// Entries arrive newest first; take the first completed one
    pub fn latest_completed(&self) -> LastRefresh {
        self.value
            .iter()
            .filter(|entry| entry.status == "Completed")
            .find_map(|entry| entry.end_time)
            .map(LastRefresh::At)
            .unwrap_or(LastRefresh::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_completed_skips_other_statuses() {
        let history: RefreshHistory = serde_json::from_str(
            r#"{"value": [
                {"status": "Unknown"},
                {"status": "Failed", "endTime": "2026-10-17T09:00:00Z"},
                {"status": "Completed", "endTime": "2026-10-17T06:30:00Z"},
                {"status": "Completed", "endTime": "2026-10-16T06:30:00Z"}
            ]}"#,
        )
        .unwrap();

        let refresh = history.latest_completed();
        assert_eq!(refresh.to_string(), "17/10/2026 06:30 UTC");
    }

    #[test]
    fn test_no_completed_entry_is_unknown() {
        let history: RefreshHistory =
            serde_json::from_str(r#"{"value": [{"status": "Failed"}]}"#).unwrap();
        assert_eq!(history.latest_completed(), LastRefresh::Unknown);

        let empty: RefreshHistory = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.latest_completed(), LastRefresh::Unknown);
    }

    #[test]
    fn test_last_refresh_serializes_as_text() {
        assert_eq!(
            serde_json::to_value(LastRefresh::Unknown).unwrap(),
            serde_json::json!("unknown")
        );
    }

    #[test]
    fn test_generate_token_request_shape() {
        let body = serde_json::to_value(GenerateTokenRequest {
            access_level: "view",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"accessLevel": "view"}));
    }
}
