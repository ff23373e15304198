//! Session identity and resolution outcome

use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which credential encoding produced an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// JSON cookie with an alias field
    Primary,
    /// Composite cookie, alias is the leading segment
    Secondary,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// Alias of the currently signed-in account
///
/// Derived fresh from the cookie text on every pass and never stored.
/// The alias keeps its original case; matching against configured aliases
/// goes through [`SessionIdentity::matches`], which ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    alias: String,
    provenance: Provenance,
}

impl SessionIdentity {
    /// Create identity
    #[inline]
    #[must_use]
    pub fn new(alias: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            alias: alias.into(),
            provenance,
        }
    }

    /// Alias as found in the cookie
    #[inline]
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Which cookie the alias came from
    #[inline]
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Case-insensitive comparison against a configured alias
    #[must_use]
    pub fn matches(&self, configured: &str) -> bool {
        self.alias.to_lowercase() == configured.to_lowercase()
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alias)
    }
}

/// Outcome of reading the credential text
#[derive(Debug)]
pub enum Resolution {
    /// An alias was extracted
    Found(SessionIdentity),
    /// No credential cookie, or one without an alias
    NotPresent,
    /// A credential cookie exists but is malformed
    ParseError(IdentityError),
}

impl Resolution {
    /// Identity, if one was found
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Self::Found(identity) => Some(identity),
            _ => None,
        }
    }

    /// Consume into the identity, if one was found
    #[inline]
    #[must_use]
    pub fn into_identity(self) -> Option<SessionIdentity> {
        match self {
            Self::Found(identity) => Some(identity),
            _ => None,
        }
    }

    /// Check if an identity was found
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Check if decoding failed
    #[inline]
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_case() {
        let identity = SessionIdentity::new("Prod-Admin", Provenance::Primary);
        assert!(identity.matches("prod-admin"));
        assert!(identity.matches("PROD-ADMIN"));
        assert!(!identity.matches("prod-admin2"));
    }

    #[test]
    fn resolution_accessors() {
        let found = Resolution::Found(SessionIdentity::new("x", Provenance::Secondary));
        assert!(found.is_found());
        assert_eq!(found.identity().map(SessionIdentity::alias), Some("x"));

        let missing = Resolution::NotPresent;
        assert!(!missing.is_found());
        assert!(!missing.is_parse_error());
        assert!(missing.into_identity().is_none());
    }

    #[test]
    fn provenance_serializes_snake_case() {
        let json = serde_json::to_string(&Provenance::Secondary).unwrap();
        assert_eq!(json, "\"secondary\"");
    }
}
