//! Embed configuration endpoint
//!
//! Called by the report page script to obtain a fresh view token plus the
//! section of the shared report that the page shows.

use crate::session::OptionalSession;
use crate::{AppState, WebError, WebResult};
use axum::{
    extract::{Path, State},
    response::Json,
};
use biportal_embed::LastRefresh;
use serde::Serialize;
use tracing::{info, warn};

/// JSON handed to the embedding script
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfigResponse {
    pub embed_token: String,
    pub embed_url: String,
    pub report_id: String,
    /// Report section id for the requested page
    pub page_name: String,
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<LastRefresh>,
}

/// Build the embed configuration for one page
pub async fn get_embed_config(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Path(page_key): Path<String>,
) -> WebResult<Json<EmbedConfigResponse>> {
    let directory = &state.directory;

    if state.config.enforce_embed_policy {
        let session = session.as_ref().ok_or(WebError::Unauthenticated)?;
        if !directory
            .policy
            .can_access(Some(session.role.as_str()), &page_key)
        {
            warn!(
                username = %session.username,
                role = %session.role,
                page = %page_key,
                "Embed config denied"
            );
            return Err(WebError::Forbidden {
                role: session.role.to_string(),
                page: page_key,
            });
        }
    }

    // Resolve the page before spending an upstream round trip
    let section = directory.catalog.section_for(&page_key)?;

    let broker = &state.broker;
    let (token, last_refresh) = tokio::join!(broker.generate_embed_token(), async {
        if broker.tracks_refresh() {
            Some(broker.last_refresh().await)
        } else {
            None
        }
    });
    let token = token.map_err(WebError::Upstream)?;

    info!(page = %page_key, "Embed token issued");

    Ok(Json(EmbedConfigResponse {
        embed_token: token.token,
        embed_url: broker.embed_url(),
        report_id: broker.report_id().to_string(),
        page_name: section.to_string(),
        role: session.as_ref().map(|s| s.role.to_string()),
        contact: session.and_then(|s| s.contact),
        last_refresh,
    }))
}
