//! BI Portal Access - who may log in and which pages they may open
//!
//! - [`CredentialStore`]: static login table
//! - [`AccessPolicy`]: role → allowed pages
//! - [`PageCatalog`]: the dashboard pages and their report sections
//!
//! [`AccessDirectory`] bundles the three so the web layer receives them as one
//! immutable value built at startup.

pub mod credentials;
pub mod pages;
pub mod policy;
pub mod roles;

pub use credentials::{normalize_username, CredentialStore, LoginError, UserRecord};
pub use pages::{Page, PageCatalog, PageKey};
pub use policy::AccessPolicy;
pub use roles::Role;

use biportal_core::{PortalConfig, PortalResult};
use tracing::info;

/// Read-only access configuration shared by every request
#[derive(Debug, Clone, Default)]
pub struct AccessDirectory {
    pub credentials: CredentialStore,
    pub policy: AccessPolicy,
    pub catalog: PageCatalog,
}

impl AccessDirectory {
    /// Build from the portal file; empty sections fall back to the built-ins
    pub fn from_config(config: &PortalConfig) -> PortalResult<Self> {
        let credentials = if config.users.is_empty() {
            CredentialStore::builtin()
        } else {
            CredentialStore::from_entries(&config.users)?
        };
        let policy = AccessPolicy::from_section(&config.policy)?;

        info!(
            users = credentials.len(),
            restricted_pages = policy.restricted_pages().count(),
            "Access directory loaded"
        );

        Ok(Self {
            credentials,
            policy,
            catalog: PageCatalog::builtin(),
        })
    }
}
