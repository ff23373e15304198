//! Names of the credential cookies and how to read them

use serde::{Deserialize, Serialize};

/// Cookie names and field layout used to find the alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialKeys {
    /// Cookie holding percent-encoded JSON
    pub primary: String,
    /// Field of the primary JSON object holding the alias
    pub alias_field: String,
    /// Fallback cookie holding a percent-encoded composite string
    pub secondary: String,
    /// Separator ending the alias segment in the secondary value
    pub separator: char,
}

impl CredentialKeys {
    /// Default console cookie layout
    pub const PRIMARY: &'static str = "aws-userInfo";
    /// Default alias field
    pub const ALIAS_FIELD: &'static str = "alias";
    /// Default fallback cookie
    pub const SECONDARY: &'static str = "aws-account-alias";
    /// Default secondary separator
    pub const SEPARATOR: char = '-';

    /// Create default layout
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With primary cookie name
    #[inline]
    #[must_use]
    pub fn with_primary(mut self, name: impl Into<String>) -> Self {
        self.primary = name.into();
        self
    }

    /// With alias field name
    #[inline]
    #[must_use]
    pub fn with_alias_field(mut self, field: impl Into<String>) -> Self {
        self.alias_field = field.into();
        self
    }

    /// With fallback cookie name
    #[inline]
    #[must_use]
    pub fn with_secondary(mut self, name: impl Into<String>) -> Self {
        self.secondary = name.into();
        self
    }

    /// With secondary separator
    #[inline]
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}

impl Default for CredentialKeys {
    fn default() -> Self {
        Self {
            primary: Self::PRIMARY.to_string(),
            alias_field: Self::ALIAS_FIELD.to_string(),
            secondary: Self::SECONDARY.to_string(),
            separator: Self::SEPARATOR,
        }
    }
}
