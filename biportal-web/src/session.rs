//! Session carrier
//!
//! The logged-in identity lives entirely in three client-held cookies:
//! `role`, `username` and the optional `email` contact. Nothing is stored on
//! the server. The values are neither signed nor encrypted, so a forged
//! `role` cookie is indistinguishable from a real login.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use biportal_access::{Role, UserRecord};
use tracing::debug;

pub const ROLE_COOKIE: &str = "role";
pub const USERNAME_COOKIE: &str = "username";
pub const CONTACT_COOKIE: &str = "email";

const SESSION_COOKIES: [&str; 3] = [ROLE_COOKIE, USERNAME_COOKIE, CONTACT_COOKIE];

/// Identity of the caller as read from its cookies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub username: String,
    pub contact: Option<String>,
}

impl Session {
    pub fn from_user(user: &UserRecord) -> Self {
        Self {
            role: user.role,
            username: user.username.clone(),
            contact: user.contact.clone(),
        }
    }

    /// `None` when the role cookie is missing or names no known role
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        let raw_role = jar.get(ROLE_COOKIE)?.value().to_string();
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(_) => {
                debug!("Ignoring session with unrecognised role cookie");
                return None;
            }
        };

        Some(Self {
            role,
            username: jar
                .get(USERNAME_COOKIE)
                .map(|c| c.value().to_string())
                .unwrap_or_default(),
            contact: jar
                .get(CONTACT_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Add the session cookies to `jar`
    pub fn write(&self, jar: CookieJar) -> CookieJar {
        let jar = jar
            .add(session_cookie(ROLE_COOKIE, self.role.as_str().to_string()))
            .add(session_cookie(USERNAME_COOKIE, self.username.clone()));

        match &self.contact {
            Some(contact) => jar.add(session_cookie(CONTACT_COOKIE, contact.clone())),
            // A stale contact from an earlier login must not survive
            None => jar.remove(removal_cookie(CONTACT_COOKIE)),
        }
    }

    /// Expire every session cookie
    pub fn clear(jar: CookieJar) -> CookieJar {
        SESSION_COOKIES
            .into_iter()
            .fold(jar, |jar, name| jar.remove(removal_cookie(name)))
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Rejection sending anonymous callers back to the login form
#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary("/").into_response()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Session::from_jar(&CookieJar::from_headers(&parts.headers)).ok_or(LoginRedirect)
    }
}

/// Optional session extractor - never rejects
pub struct OptionalSession(pub Option<Session>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(Session::from_jar(&CookieJar::from_headers(
            &parts.headers,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_from_jar() {
        let session =
            Session::from_jar(&jar_with("role=admin; username=rafael.rosa; email=r@x.com"))
                .unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.username, "rafael.rosa");
        assert_eq!(session.contact.as_deref(), Some("r@x.com"));
    }

    #[test]
    fn test_legacy_role_names_are_accepted() {
        let session = Session::from_jar(&jar_with("role=limitado; username=bianca")).unwrap();
        assert_eq!(session.role, Role::Limited);
        assert_eq!(session.contact, None);
    }

    #[test]
    fn test_missing_or_unknown_role_is_anonymous() {
        assert!(Session::from_jar(&jar_with("username=rafael.rosa")).is_none());
        assert!(Session::from_jar(&jar_with("role=superuser; username=x")).is_none());
        assert!(Session::from_jar(&CookieJar::new()).is_none());
    }

    #[test]
    fn test_write_sets_flags() {
        let session = Session {
            role: Role::Limited,
            username: "bianca.coelho".to_string(),
            contact: Some("b@x.com".to_string()),
        };
        let jar = session.write(CookieJar::new());

        let role = jar.get(ROLE_COOKIE).unwrap();
        assert_eq!(role.value(), "limited");
        assert_eq!(role.path(), Some("/"));
        assert_eq!(role.http_only(), Some(true));
        assert_eq!(jar.get(CONTACT_COOKIE).unwrap().value(), "b@x.com");

        assert_eq!(Session::from_jar(&jar), Some(session));
    }

    #[test]
    fn test_clear_removes_everything() {
        let jar = jar_with("role=admin; username=rafael.rosa; email=r@x.com");
        let jar = Session::clear(jar);
        assert!(jar.get(ROLE_COOKIE).is_none());
        assert!(jar.get(USERNAME_COOKIE).is_none());
        assert!(jar.get(CONTACT_COOKIE).is_none());
        assert!(Session::from_jar(&jar).is_none());
    }
}
