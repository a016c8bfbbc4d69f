//! Portal roles
//!
//! Deployments name the two roles differently (`admin`/`limitado` in one,
//! `gerente`/`analista` in another). All spellings collapse onto one enum.

use serde::{Deserialize, Serialize};

/// Role carried by a logged-in user
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every page
    Admin,
    /// Sees only the pages in the restricted allow-list
    Limited,
}

impl Role {
    /// Canonical name written into the session cookie
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Limited => "limited",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "gerente" => Ok(Role::Admin),
            "limited" | "limitado" | "analista" => Ok(Role::Limited),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("Gerente".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("limitado".parse::<Role>(), Ok(Role::Limited));
        assert_eq!("analista".parse::<Role>(), Ok(Role::Limited));
        assert_eq!("LIMITED".parse::<Role>(), Ok(Role::Limited));
    }

    #[test]
    fn test_unknown_role() {
        assert!("root".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!(" admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_round_trips_canonical_name() {
        for role in [Role::Admin, Role::Limited] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert_eq!(Role::Limited.to_string(), "limited");
    }
}
