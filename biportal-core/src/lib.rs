//! BI Portal Core - shared error, logging and configuration types
//!
//! Every other portal crate builds on the definitions in this crate.

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
