use std::fmt;

use crate::error::{Error, Result};

/// The resolved owner id of a caller.
///
/// Every repository operation takes one explicitly; there is no ambient
/// session. Constructing one from a blank id fails with `Unauthenticated`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(Error::Unauthenticated);
        }
        Ok(Self(user_id))
    }

    /// Maps an identity provider's "current user" answer onto an identity.
    pub fn require(current_user: Option<&str>) -> Result<Self> {
        current_user.ok_or(Error::Unauthenticated).and_then(Self::new)
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_is_unauthenticated() {
        assert!(matches!(Identity::require(None), Err(Error::Unauthenticated)));
        assert!(matches!(
            Identity::require(Some("  ")),
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_identity_keeps_id() {
        let id = Identity::require(Some("user-1")).unwrap();
        assert_eq!(id.user_id(), "user-1");
        assert_eq!(id.to_string(), "user-1");
    }
}
