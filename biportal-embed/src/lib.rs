//! BI Portal Embed - server-side token brokering
//!
//! Exchanges a service credential for an access token with the identity
//! provider, then exchanges that for a report-scoped view token.

pub mod broker;
pub mod config;
pub mod types;

mod client;


pub use broker::{PowerBiBroker, TokenBroker};
pub use config::{BrokerConfig, ReportTarget};
pub use types::{EmbedToken, LastRefresh};
