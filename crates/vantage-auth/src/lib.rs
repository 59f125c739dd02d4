//! Pluggable authentication for Vantage.
//!
//! A host supports several login mechanisms behind one interface. Each
//! mechanism is an [`AuthPlugin`]: a capability descriptor, an applicability
//! predicate and a factory for per-attempt [`AuthHandler`]s.
//!
//! # Flow
//!
//! ```text
//! LoginContext ──> AuthPluginRegistry::select ──> Selection
//!                        │ (none applicable)           │ begin
//!                        ▼                             ▼
//!                  SelectionError               LoginAttempt ──run──> UserContext
//!                                                      │                  or AuthError
//!                                               AbandonHandle
//! ```
//!
//! Selection failures and login failures are separate types: a
//! [`SelectionError`] is returned synchronously by
//! [`select`](AuthPluginRegistry::select), while an [`AuthError`] comes out of
//! [`LoginAttempt::run`].
//!
//! The library ships no concrete plugins; hosts register their own.

mod capability;
mod config;
mod context;
mod error;
mod login;
mod plugin;
mod registry;
mod user;

pub use capability::{CapabilityDescriptor, CapabilityId};
pub use config::AuthConfig;
pub use context::LoginContext;
pub use error::{AuthConfigError, AuthError, SelectionError};
pub use login::{AbandonHandle, LoginAttempt};
pub use plugin::{AuthHandler, AuthPlugin};
pub use registry::{AuthPluginRegistry, Selection};
pub use user::{SessionToken, User, UserContext, UserPermissions};
