//! Portal configuration file
//!
//! The on-disk format is TOML. Secrets for the token services are never read
//! from this file; they come from the environment.

use crate::error::{ErrorContext, PortalError, PortalResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level portal configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Login table; empty means "use the built-in table"
    pub users: Vec<UserEntry>,
    pub policy: PolicySection,
    pub embed: EmbedSection,
    pub logging: LoggingConfig,
}

/// One row of the login table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Page allow-list for the restricted role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// `None` keeps the built-in allow-list
    pub restricted_pages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSection {
    /// Re-check the access policy before minting an embed token
    pub enforce_access_policy: bool,
}

impl Default for EmbedSection {
    fn default() -> Self {
        Self {
            enforce_access_policy: true,
        }
    }
}

impl PortalConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> PortalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PortalError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> PortalResult<Self> {
        toml::from_str(content).map_err(|e| PortalError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Structural checks that do not need the role and page vocabularies
    pub fn validate(&self) -> PortalResult<()> {
        for (index, user) in self.users.iter().enumerate() {
            if user.username.trim().is_empty() {
                return Err(PortalError::Validation {
                    message: format!("users[{}] has an empty username", index),
                    field: Some("users.username".to_string()),
                    context: ErrorContext::new("config").with_operation("validate"),
                });
            }
            if user.password.is_empty() {
                return Err(PortalError::Validation {
                    message: format!("user '{}' has an empty password", user.username),
                    field: Some("users.password".to_string()),
                    context: ErrorContext::new("config").with_operation("validate"),
                });
            }
            if user.password.trim() != user.password {
                return Err(PortalError::Validation {
                    message: format!(
                        "user '{}' has leading or trailing whitespace in its password",
                        user.username
                    ),
                    field: Some("users.password".to_string()),
                    context: ErrorContext::new("config")
                        .with_operation("validate")
                        .with_suggestion("Submitted passwords are trimmed; remove the padding"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[users]]
username = "ana.souza"
password = "s3nha"
role = "gerente"
contact = "ana@example.com"

[[users]]
username = "joao"
password = "123"
role = "analista"

[policy]
restricted_pages = ["desempenho"]

[embed]
enforce_access_policy = false
"#;

    #[test]
    fn test_parse_sample() {
        let config = PortalConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].contact.as_deref(), Some("ana@example.com"));
        assert_eq!(config.users[1].contact, None);
        assert_eq!(
            config.policy.restricted_pages,
            Some(vec!["desempenho".to_string()])
        );
        assert!(!config.embed.enforce_access_policy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PortalConfig::from_toml_str("").unwrap();
        assert!(config.users.is_empty());
        assert!(config.policy.restricted_pages.is_none());
        assert!(config.embed.enforce_access_policy);
    }

    #[test]
    fn test_blank_username_rejected() {
        let config = PortalConfig::from_toml_str(
            "[[users]]\nusername = \"  \"\npassword = \"x\"\nrole = \"admin\"\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(PortalError::Validation { .. })
        ));
    }

    #[test]
    fn test_padded_password_rejected() {
        let config = PortalConfig::from_toml_str(
            "[[users]]\nusername = \"ana\"\npassword = \"s3nha \"\nrole = \"admin\"\n",
        )
        .unwrap();
        match config.validate() {
            Err(PortalError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("users.password"))
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = PortalConfig::from_file(file.path()).unwrap();
        assert_eq!(config.users[1].username, "joao");

        let missing = PortalConfig::from_file("/nonexistent/portal.toml");
        assert!(matches!(missing, Err(PortalError::Config { .. })));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let result = PortalConfig::from_toml_str("[[users]\nusername=");
        assert!(matches!(result, Err(PortalError::Config { .. })));
    }
}
