//! Error types for plugin selection and login flows.
//!
//! Selection and login fail in distinct ways and are kept in distinct types:
//! a host that gets [`SelectionError`] has nothing to show a login form for,
//! while an [`AuthError`] comes from a plugin that was chosen and tried.

use crate::capability::CapabilityId;

/// No registered plugin can serve the login context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Every registered plugin was disabled or declined the context.
    #[error("No applicable auth plugin among {} candidate(s)", candidates.len())]
    NoApplicablePlugin {
        /// Capabilities that were considered, in registration order.
        candidates: Vec<CapabilityId>,
    },
}

/// A login attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the supplied credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The server refused the login for another reason.
    #[error("Login rejected: {0}")]
    Rejected(String),

    /// The mechanism could not be used (no parent session, transport down).
    #[error("Authentication unavailable: {0}")]
    Unavailable(String),

    /// The host abandoned the attempt before it resolved.
    #[error("Login abandoned")]
    Abandoned,

    /// The handler failed internally.
    #[error("Auth handler error: {0}")]
    Handler(String),
}

impl AuthError {
    /// Create a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create an unavailability error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a handler error.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Whether the host may re-prompt or retry with the same plugin.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Rejected(_))
    }
}

/// The auth configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum AuthConfigError {
    /// The TOML could not be parsed.
    #[error("Invalid auth configuration: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },

    /// A capability id was empty.
    #[error("Capability id at position {index} is blank")]
    BlankCapability {
        /// Position in the `disabled` list.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable() {
        assert!(AuthError::InvalidCredentials.is_recoverable());
        assert!(AuthError::rejected("expired").is_recoverable());
        assert!(!AuthError::Abandoned.is_recoverable());
        assert!(!AuthError::unavailable("no parent").is_recoverable());
        assert!(!AuthError::handler("boom").is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = SelectionError::NoApplicablePlugin {
            candidates: vec![CapabilityId::PSK, CapabilityId::PARENT],
        };
        assert_eq!(err.to_string(), "No applicable auth plugin among 2 candidate(s)");
        assert_eq!(
            AuthError::rejected("account locked").to_string(),
            "Login rejected: account locked"
        );
    }
}
