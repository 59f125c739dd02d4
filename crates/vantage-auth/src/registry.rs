//! Ordered plugin registry and selection.
//!
//! The host registers every plugin it ships at startup, in priority order.
//! Selection walks that order and picks the first enabled plugin that accepts
//! the login context; registration order is the only tie-break.

use std::fmt;
use std::sync::Arc;

use vantage_core::PerfSpan;

use crate::capability::{CapabilityDescriptor, CapabilityId};
use crate::config::AuthConfig;
use crate::context::LoginContext;
use crate::error::SelectionError;
use crate::login::LoginAttempt;
use crate::plugin::AuthPlugin;

/// Host-assembled, ordered list of authentication plugins.
///
/// # Example
///
/// ```
/// # use async_trait::async_trait;
/// # use vantage_auth::*;
/// # struct Guest;
/// # #[async_trait]
/// # impl AuthHandler for Guest {
/// #     async fn attempt_login(&mut self, _: &LoginContext) -> Result<UserContext, AuthError> {
/// #         Ok(UserContext::new(SessionToken::new("t"), User::new("guest")))
/// #     }
/// # }
/// struct Anonymous;
///
/// impl AuthPlugin for Anonymous {
///     fn descriptor(&self) -> CapabilityDescriptor {
///         CapabilityDescriptor::new(CapabilityId::ANONYMOUS, "Anonymous")
///     }
///
///     fn create_handler(&self, _: &LoginContext) -> Box<dyn AuthHandler> {
///         Box::new(Guest)
///     }
/// }
///
/// let mut registry = AuthPluginRegistry::new();
/// registry.register(Anonymous);
///
/// let context = LoginContext::new().with_auth_handler(CapabilityId::ANONYMOUS);
/// let selection = registry.select(&context).unwrap();
/// assert_eq!(selection.capability(), CapabilityId::ANONYMOUS);
///
/// let err = registry.select(&LoginContext::new()).unwrap_err();
/// assert!(matches!(err, SelectionError::NoApplicablePlugin { .. }));
/// ```
#[derive(Default)]
pub struct AuthPluginRegistry {
    plugins: Vec<Arc<dyn AuthPlugin>>,
    config: AuthConfig,
}

impl AuthPluginRegistry {
    /// An empty registry with every capability enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply host configuration.
    pub fn with_config(mut self, config: AuthConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the host configuration.
    pub fn set_config(&mut self, config: AuthConfig) {
        self.config = config;
    }

    /// The host configuration in effect.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Append a plugin. Earlier registrations win ties.
    pub fn register(&mut self, plugin: impl AuthPlugin + 'static) -> &mut Self {
        self.register_shared(Arc::new(plugin))
    }

    /// Append a plugin the host also holds elsewhere.
    pub fn register_shared(&mut self, plugin: Arc<dyn AuthPlugin>) -> &mut Self {
        let descriptor = plugin.descriptor();
        if self.plugins.iter().any(|p| p.capability() == descriptor.id) {
            tracing::warn!(
                target: "vantage_auth::selector",
                capability = %descriptor.id,
                "capability registered twice; the earlier plugin takes priority"
            );
        }
        tracing::debug!(
            target: "vantage_auth::selector",
            capability = %descriptor.id,
            position = self.plugins.len(),
            "registered auth plugin"
        );
        self.plugins.push(plugin);
        self
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Descriptors of every registered plugin, in registration order.
    pub fn capabilities(&self) -> Vec<CapabilityDescriptor> {
        self.plugins.iter().map(|p| p.descriptor()).collect()
    }

    /// Pick the first enabled plugin that accepts `context`.
    ///
    /// No handler is created here; call [`Selection::begin`] for that.
    #[tracing::instrument(
        name = "vantage::select",
        target = "vantage_auth::selector",
        skip_all,
        level = "debug"
    )]
    pub fn select(&self, context: &LoginContext) -> Result<Selection, SelectionError> {
        let _perf = PerfSpan::new("select_auth_plugin");

        for (position, plugin) in self.plugins.iter().enumerate() {
            let id = plugin.capability();
            if !self.config.is_enabled(&id) {
                tracing::debug!(
                    target: "vantage_auth::selector",
                    capability = %id,
                    "skipped: disabled"
                );
                continue;
            }
            if !plugin.is_applicable(context) {
                tracing::debug!(
                    target: "vantage_auth::selector",
                    capability = %id,
                    "skipped: not applicable"
                );
                continue;
            }

            tracing::info!(
                target: "vantage_auth::selector",
                capability = %id,
                position,
                "selected auth plugin"
            );
            return Ok(Selection {
                plugin: plugin.clone(),
                position,
            });
        }

        let candidates: Vec<CapabilityId> = self.plugins.iter().map(|p| p.capability()).collect();
        tracing::warn!(
            target: "vantage_auth::selector",
            candidates = candidates.len(),
            "no applicable auth plugin"
        );
        Err(SelectionError::NoApplicablePlugin { candidates })
    }
}

impl fmt::Debug for AuthPluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPluginRegistry")
            .field("plugins", &self.capabilities())
            .field("config", &self.config)
            .finish()
    }
}

/// The plugin chosen for a login context.
#[derive(Clone)]
pub struct Selection {
    plugin: Arc<dyn AuthPlugin>,
    position: usize,
}

impl Selection {
    /// What the selected plugin implements.
    pub fn descriptor(&self) -> CapabilityDescriptor {
        self.plugin.descriptor()
    }

    /// The selected capability.
    pub fn capability(&self) -> CapabilityId {
        self.plugin.capability()
    }

    /// Registration index of the selected plugin.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The selected plugin.
    pub fn plugin(&self) -> &Arc<dyn AuthPlugin> {
        &self.plugin
    }

    /// Create a handler and wrap it in a fresh login attempt.
    ///
    /// Each call starts an independent attempt.
    pub fn begin(&self, context: &LoginContext) -> LoginAttempt {
        let handler = self.plugin.create_handler(context);
        LoginAttempt::new(self.capability(), handler, context.clone())
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("capability", &self.capability())
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::plugin::AuthHandler;
    use crate::user::{SessionToken, User, UserContext};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl AuthHandler for Noop {
        async fn attempt_login(&mut self, _: &LoginContext) -> Result<UserContext, AuthError> {
            Ok(UserContext::new(SessionToken::new("t"), User::new("n")))
        }
    }

    struct Fixed {
        id: &'static str,
        applicable: bool,
    }

    impl AuthPlugin for Fixed {
        fn descriptor(&self) -> CapabilityDescriptor {
            CapabilityDescriptor::new(CapabilityId::new(self.id), self.id)
        }

        fn is_applicable(&self, _context: &LoginContext) -> bool {
            self.applicable
        }

        fn create_handler(&self, _context: &LoginContext) -> Box<dyn AuthHandler> {
            Box::new(Noop)
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = AuthPluginRegistry::new();
        assert!(registry.is_empty());
        let err = registry.select(&LoginContext::new()).unwrap_err();
        assert_eq!(err, SelectionError::NoApplicablePlugin { candidates: vec![] });
    }

    #[test]
    fn test_disabled_plugin_skipped() {
        let mut registry =
            AuthPluginRegistry::new().with_config(AuthConfig::default().disable(&"a".into()));
        registry
            .register(Fixed { id: "a", applicable: true })
            .register(Fixed { id: "b", applicable: true });

        let selection = registry.select(&LoginContext::new()).unwrap();
        assert_eq!(selection.capability().as_str(), "b");
        assert_eq!(selection.position(), 1);
    }

    #[test]
    fn test_all_disabled_lists_candidates() {
        let mut registry = AuthPluginRegistry::new();
        registry.register(Fixed { id: "a", applicable: true });
        registry.set_config(AuthConfig::default().disable(&"a".into()));

        let err = registry.select(&LoginContext::new()).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NoApplicablePlugin {
                candidates: vec![CapabilityId::new("a")]
            }
        );
    }

    #[test]
    fn test_default_applicability_uses_advertised_handlers() {
        struct Advertised;
        impl AuthPlugin for Advertised {
            fn descriptor(&self) -> CapabilityDescriptor {
                CapabilityDescriptor::new(CapabilityId::PSK, "Pre-shared key")
            }
            fn create_handler(&self, _: &LoginContext) -> Box<dyn AuthHandler> {
                Box::new(Noop)
            }
        }

        let mut registry = AuthPluginRegistry::new();
        registry.register(Advertised);

        assert!(registry.select(&LoginContext::new()).is_err());
        let context = LoginContext::new().with_auth_handler(CapabilityId::PSK);
        assert_eq!(registry.select(&context).unwrap().capability(), CapabilityId::PSK);
    }

    #[test]
    fn test_capabilities_in_order() {
        let mut registry = AuthPluginRegistry::new();
        registry
            .register(Fixed { id: "z", applicable: false })
            .register(Fixed { id: "a", applicable: false });
        let ids: Vec<_> = registry
            .capabilities()
            .into_iter()
            .map(|d| d.id.to_string())
            .collect();
        assert_eq!(ids, ["z", "a"]);
        assert_eq!(registry.len(), 2);
    }
}
