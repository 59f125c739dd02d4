//! Vantage - extension-point contracts for analytics hosts.
//!
//! This is the umbrella crate that re-exports all public APIs.
//!
//! - [`chart`]: the visualization model contract (feature `chart`)
//! - [`auth`]: the pluggable authentication contract (feature `auth`)
//!
//! The event bus and logging targets from `vantage-core` are re-exported at
//! the crate root.
//!
//! # Example
//!
//! ```
//! use vantage::auth::{AuthPluginRegistry, LoginContext, SelectionError};
//!
//! let registry = AuthPluginRegistry::new();
//! match registry.select(&LoginContext::new()) {
//!     Err(SelectionError::NoApplicablePlugin { candidates }) => assert!(candidates.is_empty()),
//!     Ok(_) => unreachable!("nothing registered"),
//! }
//! ```

pub use vantage_core::*;

/// Visualization model contract.
#[cfg(feature = "chart")]
pub mod chart {
    pub use vantage_chart::*;
}

/// Pluggable authentication contract.
#[cfg(feature = "auth")]
pub mod auth {
    pub use vantage_auth::*;
}

/// Version of the Vantage contracts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
