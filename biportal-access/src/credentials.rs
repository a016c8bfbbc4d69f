//! Login table and credential checks
//!
//! Passwords are stored and compared in plain text. The table is loaded once
//! at startup and never mutated.

use crate::roles::Role;
use biportal_core::{validation_error, PortalResult, UserEntry};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One user of the portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Lowercase login name
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Contact attribute forwarded to the embed config (usually an e-mail)
    pub contact: Option<String>,
}

/// Why a login was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Static username → user mapping
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: HashMap<String, UserRecord>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lookup key for a submitted username
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl CredentialStore {
    /// The built-in login table
    pub fn builtin() -> Self {
        let users = [
            UserRecord {
                username: "rafael.rosa".to_string(),
                password: "123".to_string(),
                role: Role::Admin,
                contact: None,
            },
            UserRecord {
                username: "bianca.coelho".to_string(),
                password: "123".to_string(),
                role: Role::Limited,
                contact: None,
            },
        ];
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// Build the table from configuration rows
    pub fn from_entries(entries: &[UserEntry]) -> PortalResult<Self> {
        let mut users = HashMap::with_capacity(entries.len());

        for entry in entries {
            let username = normalize_username(&entry.username);
            if username.is_empty() {
                return Err(validation_error!(
                    "username must not be empty",
                    "users.username",
                    "credential_store"
                ));
            }

            // Submitted passwords are trimmed, so padded ones could never match
            if entry.password.is_empty() || entry.password.trim() != entry.password {
                return Err(validation_error!(
                    format!(
                        "user '{}': password must be non-empty without surrounding whitespace",
                        username
                    ),
                    "users.password",
                    "credential_store"
                ));
            }

            let role = entry.role.parse::<Role>().map_err(|e| {
                validation_error!(
                    format!("user '{}': {}", username, e),
                    "users.role",
                    "credential_store"
                )
            })?;

            let record = UserRecord {
                username: username.clone(),
                password: entry.password.clone(),
                role,
                contact: entry.contact.clone().filter(|c| !c.trim().is_empty()),
            };

            if users.insert(username.clone(), record).is_some() {
                return Err(validation_error!(
                    format!("duplicate username '{}'", username),
                    "users.username",
                    "credential_store"
                ));
            }
        }

        Ok(Self { users })
    }

    /// Check a login submission.
    ///
    /// The username is trimmed and lowercased; the password is trimmed and
    /// must then match exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&UserRecord, LoginError> {
        let username = normalize_username(username);
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let Some(user) = self.users.get(&username) else {
            debug!("Login refused for unknown user: {}", username);
            return Err(LoginError::InvalidCredentials);
        };

        if user.password != password {
            warn!("Invalid password for user: {}", username);
            return Err(LoginError::InvalidCredentials);
        }

        debug!("User authenticated: {}", username);
        Ok(user)
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(&normalize_username(username))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
