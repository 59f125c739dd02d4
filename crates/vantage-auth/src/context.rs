//! The runtime login context plugins are evaluated against.

use std::collections::HashMap;

use crate::capability::CapabilityId;

/// Everything the host knows about the login environment.
///
/// Built by the host before selection and passed unchanged to
/// [`AuthPlugin::is_applicable`](crate::AuthPlugin::is_applicable),
/// [`AuthPlugin::create_handler`](crate::AuthPlugin::create_handler) and
/// [`AuthHandler::attempt_login`](crate::AuthHandler::attempt_login).
///
/// # Example
///
/// ```
/// use vantage_auth::{CapabilityId, LoginContext};
///
/// let context = LoginContext::new()
///     .with_auth_handler(CapabilityId::PSK)
///     .with_config_value("psk.prompt", "Enter your key")
///     .with_parent_session(false);
///
/// assert!(context.supports(&CapabilityId::PSK));
/// assert!(!context.supports(&CapabilityId::ANONYMOUS));
/// assert_eq!(context.config_value("psk.prompt"), Some("Enter your key"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginContext {
    auth_handlers: Vec<CapabilityId>,
    config: HashMap<String, String>,
    parent_session_available: bool,
    session_hints: HashMap<String, String>,
}

impl LoginContext {
    /// An empty context: no handlers advertised, no parent session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler the server advertises.
    pub fn with_auth_handler(mut self, id: CapabilityId) -> Self {
        if !self.auth_handlers.contains(&id) {
            self.auth_handlers.push(id);
        }
        self
    }

    /// Replace the advertised handlers.
    pub fn with_auth_handlers(mut self, ids: impl IntoIterator<Item = CapabilityId>) -> Self {
        self.auth_handlers.clear();
        for id in ids {
            self = self.with_auth_handler(id);
        }
        self
    }

    /// Add a server authentication configuration value.
    pub fn with_config_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Record whether an embedding parent can hand over a session.
    pub fn with_parent_session(mut self, available: bool) -> Self {
        self.parent_session_available = available;
        self
    }

    /// Add a stored hint from an earlier session (a remembered key, a user name).
    pub fn with_session_hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.session_hints.insert(key.into(), value.into());
        self
    }

    /// Handlers the server advertises, in the order it listed them.
    pub fn auth_handlers(&self) -> &[CapabilityId] {
        &self.auth_handlers
    }

    /// Whether the server accepts `id`.
    pub fn supports(&self, id: &CapabilityId) -> bool {
        self.auth_handlers.contains(id)
    }

    /// A server authentication configuration value.
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Whether an embedding parent can hand over a session.
    pub fn parent_session_available(&self) -> bool {
        self.parent_session_available
    }

    /// A stored session hint.
    pub fn session_hint(&self, key: &str) -> Option<&str> {
        self.session_hints.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_deduplicated_in_order() {
        let context = LoginContext::new()
            .with_auth_handler(CapabilityId::PSK)
            .with_auth_handler(CapabilityId::ANONYMOUS)
            .with_auth_handler(CapabilityId::PSK);
        assert_eq!(
            context.auth_handlers(),
            [CapabilityId::PSK, CapabilityId::ANONYMOUS]
        );
    }

    #[test]
    fn test_replace_handlers() {
        let context = LoginContext::new()
            .with_auth_handler(CapabilityId::PSK)
            .with_auth_handlers([CapabilityId::PARENT]);
        assert!(context.supports(&CapabilityId::PARENT));
        assert!(!context.supports(&CapabilityId::PSK));
    }

    #[test]
    fn test_hints_and_parent() {
        let context = LoginContext::new()
            .with_parent_session(true)
            .with_session_hint("user", "ada");
        assert!(context.parent_session_available());
        assert_eq!(context.session_hint("user"), Some("ada"));
        assert_eq!(context.session_hint("key"), None);
        assert_eq!(context.config_value("anything"), None);
    }
}
