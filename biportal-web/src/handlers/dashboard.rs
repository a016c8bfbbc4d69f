//! Dashboard handler

use crate::session::Session;
use crate::templates::{render, DashboardTemplate, PageCard};
use crate::{AppState, WebResult};
use axum::{extract::State, response::Html};

/// List the pages the caller's role may open
pub async fn dashboard(State(state): State<AppState>, session: Session) -> WebResult<Html<String>> {
    let directory = &state.directory;
    let pages = directory
        .policy
        .allowed_pages(session.role, &directory.catalog)
        .into_iter()
        .map(PageCard::from)
        .collect();

    render(&DashboardTemplate::new(
        session.username,
        session.role.to_string(),
        pages,
    ))
}
