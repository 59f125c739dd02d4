//! The traits an authentication mechanism implements.

use async_trait::async_trait;

use crate::capability::{CapabilityDescriptor, CapabilityId};
use crate::context::LoginContext;
use crate::error::AuthError;
use crate::user::UserContext;

/// A registered authentication mechanism.
///
/// Plugins are stateless factories. Per-attempt state lives in the
/// [`AuthHandler`] they create.
pub trait AuthPlugin: Send + Sync {
    /// What this plugin implements.
    fn descriptor(&self) -> CapabilityDescriptor;

    /// Whether this plugin can serve `context`.
    ///
    /// Called during selection; must be cheap and must not start a login.
    /// The default accepts any context whose server advertises this
    /// plugin's capability.
    fn is_applicable(&self, context: &LoginContext) -> bool {
        context.supports(&self.descriptor().id)
    }

    /// Create a handler for one login attempt.
    fn create_handler(&self, context: &LoginContext) -> Box<dyn AuthHandler>;

    /// Shorthand for `descriptor().id`.
    fn capability(&self) -> CapabilityId {
        self.descriptor().id
    }
}

/// Drives one login flow.
///
/// A handler may own a network connection. [`release`](Self::release) frees it
/// and is called exactly once by [`LoginAttempt`](crate::LoginAttempt), whether
/// the attempt succeeded, failed or was abandoned.
#[async_trait]
pub trait AuthHandler: Send {
    /// Try to log in.
    async fn attempt_login(&mut self, context: &LoginContext) -> Result<UserContext, AuthError>;

    /// Free whatever the handler acquired.
    fn release(&mut self) {}
}
