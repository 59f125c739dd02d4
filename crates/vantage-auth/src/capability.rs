//! Capability identifiers and descriptors.

use std::borrow::Cow;
use std::fmt;

/// Stable identifier of an authentication mechanism.
///
/// The server advertises the identifiers it accepts; a plugin declares the one
/// it implements. Identifiers compare by their string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityId(Cow<'static, str>);

impl CapabilityId {
    /// Sign in without credentials.
    pub const ANONYMOUS: CapabilityId = CapabilityId::from_static("anonymous");
    /// Reuse a session handed over by an embedding parent window.
    pub const PARENT: CapabilityId = CapabilityId::from_static("parent");
    /// Sign in with a pre-shared key.
    pub const PSK: CapabilityId = CapabilityId::from_static("psk");

    /// Identifier backed by a static string.
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Identifier from an owned or borrowed string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CapabilityId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for CapabilityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// What a plugin implements, as shown to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDescriptor {
    /// The mechanism implemented.
    pub id: CapabilityId,
    /// Human-readable name for login pickers and logs.
    pub display_name: String,
}

impl CapabilityDescriptor {
    /// Create a descriptor.
    pub fn new(id: CapabilityId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}
