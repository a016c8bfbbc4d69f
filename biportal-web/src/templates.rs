//! Server-rendered pages
//!
//! Templates live under `templates/` and are compiled in by Askama.

use crate::WebResult;
use askama::Template;
use axum::response::Html;
use biportal_access::Page;

const PORTAL_TITLE: &str = "Portal BI";

/// Login form, optionally showing the reason the last attempt failed
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub error: Option<String>,
}

/// Dashboard listing the pages the caller's role may open
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub username: String,
    pub role: String,
    pub pages: Vec<PageCard>,
}

/// A single report page; the embed script fetches its config by key
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub page_key: String,
    pub page_name: String,
    pub description: String,
    pub layout_class: String,
    pub username: String,
}

/// Error page template
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub error_code: u16,
    pub error_message: String,
}

/// Dashboard card data
pub struct PageCard {
    pub href: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl From<&Page> for PageCard {
    fn from(page: &Page) -> Self {
        Self {
            href: page.route_path(),
            name: page.name.to_string(),
            description: page.description.to_string(),
            icon: page.icon.to_string(),
        }
    }
}

impl LoginTemplate {
    pub fn new(error: Option<String>) -> Self {
        Self {
            title: PORTAL_TITLE.to_string(),
            error,
        }
    }
}

impl DashboardTemplate {
    pub fn new(username: String, role: String, pages: Vec<PageCard>) -> Self {
        Self {
            title: format!("{} - Dashboard", PORTAL_TITLE),
            username,
            role,
            pages,
        }
    }
}

impl PageTemplate {
    pub fn new(page: &Page, username: String) -> Self {
        Self {
            title: format!("{} - {}", PORTAL_TITLE, page.name),
            page_key: page.key.as_str().to_string(),
            page_name: page.name.to_string(),
            description: page.description.to_string(),
            layout_class: page.layout_class.to_string(),
            username,
        }
    }
}

impl ErrorTemplate {
    pub fn new(error_code: u16, error_message: String) -> Self {
        Self {
            title: format!("Erro {} - {}", error_code, PORTAL_TITLE),
            error_code,
            error_message,
        }
    }
}

/// Render any template into an HTML response body
pub fn render<T: Template>(template: &T) -> WebResult<Html<String>> {
    Ok(Html(template.render()?))
}
