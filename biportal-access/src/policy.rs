//! Access policy
//!
//! Decides whether a role may open a page. The administrator role sees every
//! page; the restricted role sees its allow-list and nothing else.

use crate::pages::{Page, PageCatalog, PageKey};
use crate::roles::Role;
use biportal_core::{validation_error, PolicySection, PortalResult};
use std::collections::BTreeSet;

/// Role → allowed pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    restricted: BTreeSet<PageKey>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AccessPolicy {
    /// Policy whose restricted role may open exactly `pages`
    pub fn new(pages: impl IntoIterator<Item = PageKey>) -> Self {
        Self {
            restricted: pages.into_iter().collect(),
        }
    }

    /// Built-in allow-list for the restricted role
    pub fn builtin() -> Self {
        Self::new([
            PageKey::Desempenho,
            PageKey::Pdv,
            PageKey::Clientes,
            PageKey::Redes,
        ])
    }

    /// Policy from the `[policy]` section of the portal file
    pub fn from_section(section: &PolicySection) -> PortalResult<Self> {
        let Some(names) = &section.restricted_pages else {
            return Ok(Self::builtin());
        };

        let pages = names
            .iter()
            .map(|name| {
                name.parse::<PageKey>().map_err(|e| {
                    validation_error!(e, "policy.restricted_pages", "access_policy")
                })
            })
            .collect::<PortalResult<Vec<_>>>()?;

        Ok(Self::new(pages))
    }

    /// Typed decision
    pub fn allows(&self, role: Role, page: PageKey) -> bool {
        match role {
            Role::Admin => true,
            Role::Limited => self.restricted.contains(&page),
        }
    }

    /// Decision over raw session and URL values.
    ///
    /// Missing or unrecognised roles are denied. The administrator role is
    /// allowed even for page keys outside the catalog.
    pub fn can_access(&self, role: Option<&str>, page_key: &str) -> bool {
        let Some(role) = role.and_then(|r| r.parse::<Role>().ok()) else {
            return false;
        };

        match role {
            Role::Admin => true,
            Role::Limited => page_key
                .parse::<PageKey>()
                .map(|page| self.allows(role, page))
                .unwrap_or(false),
        }
    }

    /// Catalog pages visible to `role`, in catalog order
    pub fn allowed_pages<'a>(&self, role: Role, catalog: &'a PageCatalog) -> Vec<&'a Page> {
        catalog
            .iter()
            .filter(|page| self.allows(role, page.key))
            .collect()
    }

    pub fn restricted_pages(&self) -> impl Iterator<Item = PageKey> + '_ {
        self.restricted.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biportal_core::PortalError;

    #[test]
    fn test_single_page_allow_list() {
        let policy = AccessPolicy::new([PageKey::Desempenho]);
        assert!(!policy.can_access(Some("limited"), "pdv"));
        assert!(policy.can_access(Some("limited"), "desempenho"));
        assert!(!policy.can_access(None, "desempenho"));
    }

    #[test]
    fn test_admin_sees_everything() {
        let policy = AccessPolicy::new([]);
        for key in PageKey::ALL {
            assert!(policy.can_access(Some("admin"), key.as_str()));
            assert!(policy.allows(Role::Admin, key));
        }
        assert!(policy.can_access(Some("gerente"), "anything"));
    }

    #[test]
    fn test_restricted_sees_exactly_its_list() {
        let policy = AccessPolicy::builtin();
        let allowed: Vec<PageKey> = PageKey::ALL
            .into_iter()
            .filter(|key| policy.can_access(Some("limitado"), key.as_str()))
            .collect();
        assert_eq!(
            allowed,
            vec![
                PageKey::Desempenho,
                PageKey::Pdv,
                PageKey::Clientes,
                PageKey::Redes
            ]
        );
    }

    #[test]
    fn test_unknown_inputs_are_denied() {
        let policy = AccessPolicy::builtin();
        assert!(!policy.can_access(Some("root"), "desempenho"));
        assert!(!policy.can_access(Some(""), "desempenho"));
        assert!(!policy.can_access(Some("limited"), ""));
        assert!(!policy.can_access(Some("limited"), "DESEMPENHO"));
        assert!(!policy.can_access(Some("limited"), "desempenho/../matriz"));
    }

    #[test]
    fn test_allowed_pages_follow_catalog_order() {
        let catalog = PageCatalog::builtin();
        let policy = AccessPolicy::new([PageKey::Redes, PageKey::Desempenho]);

        let names: Vec<&str> = policy
            .allowed_pages(Role::Limited, &catalog)
            .iter()
            .map(|p| p.key.as_str())
            .collect();
        assert_eq!(names, vec!["desempenho", "redes"]);
        assert_eq!(policy.allowed_pages(Role::Admin, &catalog).len(), 10);
    }

    #[test]
    fn test_from_section() {
        let section = PolicySection {
            restricted_pages: Some(vec!["mapa".to_string()]),
        };
        let policy = AccessPolicy::from_section(&section).unwrap();
        assert_eq!(policy.restricted_pages().collect::<Vec<_>>(), vec![PageKey::Mapa]);

        let default = AccessPolicy::from_section(&PolicySection::default()).unwrap();
        assert_eq!(default, AccessPolicy::builtin());

        let bad = PolicySection {
            restricted_pages: Some(vec!["perfil".to_string()]),
        };
        assert!(matches!(
            AccessPolicy::from_section(&bad),
            Err(PortalError::Validation { .. })
        ));
    }
}
