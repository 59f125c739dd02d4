//! The identity a successful login hands to the host.

use std::fmt;

/// Opaque session credential issued by the server.
///
/// Never printed: `Debug` shows a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the transport that needs to send it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Who is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Account the session authenticated as.
    pub name: String,
    /// Account the session acts on behalf of (usually equal to `name`).
    pub operate_as: String,
    /// Preferred short name, if the server provides one.
    pub display_name: Option<String>,
    /// Full personal name, if known.
    pub full_name: Option<String>,
    /// Groups the account belongs to.
    pub groups: Vec<String>,
    /// Avatar location.
    pub image: Option<String>,
}

impl User {
    /// A user that operates as itself.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            operate_as: name.clone(),
            name,
            ..Self::default()
        }
    }

    /// Name to show in the UI.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.full_name.as_deref())
            .unwrap_or(&self.name)
    }
}

/// What the logged-in user may do in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPermissions {
    /// Unrestricted administrative access.
    pub is_super_user: bool,
    /// May view query results but not run queries.
    pub is_query_view_only: bool,
    /// Session belongs to an automated client.
    pub is_non_interactive: bool,
    /// May open and arrange panels.
    pub can_use_panels: bool,
    /// May copy values to the clipboard.
    pub can_copy: bool,
    /// May export table data as CSV.
    pub can_download_csv: bool,
    /// May end the session from the host UI.
    pub can_logout: bool,
}

impl Default for UserPermissions {
    fn default() -> Self {
        Self {
            is_super_user: false,
            is_query_view_only: false,
            is_non_interactive: false,
            can_use_panels: true,
            can_copy: true,
            can_download_csv: true,
            can_logout: true,
        }
    }
}

/// Result of a successful login. Owned by the host once delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Credential for subsequent requests.
    pub token: SessionToken,
    /// The authenticated account.
    pub user: User,
    /// What the account may do.
    pub permissions: UserPermissions,
}

impl UserContext {
    /// A context with default permissions.
    pub fn new(token: SessionToken, user: User) -> Self {
        Self {
            token,
            user,
            permissions: UserPermissions::default(),
        }
    }

    /// Replace the permissions.
    pub fn with_permissions(mut self, permissions: UserPermissions) -> Self {
        self.permissions = permissions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_redacted_in_debug() {
        let context = UserContext::new(SessionToken::new("s3cr3t"), User::new("ada"));
        let printed = format!("{context:?}");
        assert!(!printed.contains("s3cr3t"));
        assert!(printed.contains("<redacted>"));
        assert_eq!(context.token.expose(), "s3cr3t");
    }

    #[test]
    fn test_user_label() {
        let mut user = User::new("ada");
        assert_eq!(user.operate_as, "ada");
        assert_eq!(user.label(), "ada");
        user.full_name = Some("Ada Lovelace".into());
        assert_eq!(user.label(), "Ada Lovelace");
        user.display_name = Some("Ada".into());
        assert_eq!(user.label(), "Ada");
    }

    #[test]
    fn test_default_permissions() {
        let permissions = UserPermissions::default();
        assert!(!permissions.is_super_user);
        assert!(permissions.can_logout);
    }
}
