//! Report page handler

use crate::session::Session;
use crate::templates::{render, ErrorTemplate, PageTemplate};
use crate::{AppState, WebResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;

/// Render one report page if the caller's role may open it
pub async fn report_page(
    State(state): State<AppState>,
    session: Session,
    Path(page_key): Path<String>,
) -> WebResult<Response> {
    let directory = &state.directory;

    if !directory
        .policy
        .can_access(Some(session.role.as_str()), &page_key)
    {
        warn!(
            username = %session.username,
            role = %session.role,
            page = %page_key,
            "Page access denied"
        );
        return Ok(Redirect::temporary("/dashboard").into_response());
    }

    match directory.catalog.lookup(&page_key) {
        Some(page) => Ok(render(&PageTemplate::new(page, session.username))?.into_response()),
        // Admins pass the policy for any key, including ones with no page
        None => {
            let body = render(&ErrorTemplate::new(
                StatusCode::NOT_FOUND.as_u16(),
                format!("Página '{}' não encontrada", page_key),
            ))?;
            Ok((StatusCode::NOT_FOUND, body).into_response())
        }
    }
}
