//! Login and logout handlers

use crate::session::{OptionalSession, Session};
use crate::templates::{render, LoginTemplate};
use crate::{AppState, WebResult};
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use biportal_access::LoginError;
use serde::Deserialize;
use tracing::{debug, info, warn};

const INVALID_CREDENTIALS_MESSAGE: &str = "Usuário ou senha inválidos";
const MISSING_CREDENTIALS_MESSAGE: &str = "Informe usuário e senha";

/// Login form submission
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Render the login form
pub async fn login_page(OptionalSession(session): OptionalSession) -> WebResult<Html<String>> {
    if let Some(session) = session {
        debug!("Login form requested by signed-in user {}", session.username);
    }
    render(&LoginTemplate::new(None))
}

/// Check the submitted credentials and start a session
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    match state
        .directory
        .credentials
        .authenticate(&form.username, &form.password)
    {
        Ok(user) => {
            info!(username = %user.username, role = %user.role, "User logged in");
            let jar = Session::from_user(user).write(jar);
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(error) => {
            warn!(username = %form.username.trim(), "Login failed: {}", error);
            let message = match error {
                LoginError::MissingCredentials => MISSING_CREDENTIALS_MESSAGE,
                LoginError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            };
            Ok(render(&LoginTemplate::new(Some(message.to_string())))?.into_response())
        }
    }
}

/// End the session and return to the login form
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (Session::clear(jar), Redirect::temporary("/"))
}
