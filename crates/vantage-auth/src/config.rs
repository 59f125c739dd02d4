//! Host-level auth configuration.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityId;
use crate::error::AuthConfigError;

/// Which registered capabilities the host allows.
///
/// ```
/// use vantage_auth::{AuthConfig, CapabilityId};
///
/// let config = AuthConfig::from_toml_str(r#"disabled = ["anonymous"]"#).unwrap();
/// assert!(!config.is_enabled(&CapabilityId::ANONYMOUS));
/// assert!(config.is_enabled(&CapabilityId::PSK));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Capability ids the selector must skip.
    pub disabled: Vec<String>,
}

impl AuthConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, AuthConfigError> {
        let config: Self = toml::from_str(text)?;
        if let Some(index) = config.disabled.iter().position(|id| id.trim().is_empty()) {
            return Err(AuthConfigError::BlankCapability { index });
        }
        Ok(config)
    }

    /// Disable a capability.
    pub fn disable(mut self, id: &CapabilityId) -> Self {
        if self.is_enabled(id) {
            self.disabled.push(id.as_str().to_string());
        }
        self
    }

    /// Whether the selector may pick plugins implementing `id`.
    pub fn is_enabled(&self, id: &CapabilityId) -> bool {
        !self.disabled.iter().any(|disabled| disabled == id.as_str())
    }
}
