//! HTTP request handlers for the portal
//!
//! Handlers are grouped by the portal area they serve.

pub mod dashboard;
pub mod embed;
pub mod health;
pub mod login;
pub mod pages;

pub use dashboard::*;
pub use embed::*;
pub use health::*;
pub use login::*;
pub use pages::*;

use crate::templates::{render, ErrorTemplate};
use crate::WebResult;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> WebResult<Response> {
    tracing::debug!("No route for {}", uri.path());
    let page = render(&ErrorTemplate::new(
        StatusCode::NOT_FOUND.as_u16(),
        "Página não encontrada".to_string(),
    ))?;
    Ok((StatusCode::NOT_FOUND, page).into_response())
}
