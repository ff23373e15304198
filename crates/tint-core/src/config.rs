//! Runtime configuration
//!
//! Every field has a default matching the console page layout, so an empty
//! TOML file (or none at all) is a valid configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tint_identity::CredentialKeys;

/// Tint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TintConfig {
    /// Credential cookie layout
    pub credentials: CredentialKeys,
    /// Id of the element containing the navigation bar
    pub container_id: String,
    /// Tag of the navigation bar inside the container
    pub target_tag: String,
    /// Attributes whose changes are observed
    pub observed_attributes: Vec<String>,
    /// Quiet period before a mutation-triggered pass, in milliseconds
    pub debounce_ms: u64,
    /// Storage namespace holding the mapping
    pub storage_namespace: String,
    /// Storage key holding the mapping
    pub storage_key: String,
}

impl TintConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With credential layout
    #[inline]
    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialKeys) -> Self {
        self.credentials = credentials;
        self
    }

    /// With container id and target tag
    #[inline]
    #[must_use]
    pub fn with_target(mut self, container_id: impl Into<String>, tag: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self.target_tag = tag.into();
        self
    }

    /// With debounce delay
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With storage namespace and key
    #[inline]
    #[must_use]
    pub fn with_storage(mut self, namespace: impl Into<String>, key: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self.storage_key = key.into();
        self
    }

    /// Debounce delay as a duration
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// - `ConfigError::ParseToml` on malformed TOML
    /// - `ConfigError::Invalid` if a required name is empty
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::parse_toml("<inline>", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::ReadFile` if the file cannot be read
    /// - `ConfigError::ParseToml` on malformed TOML
    /// - `ConfigError::Invalid` if a required name is empty
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::parse_toml(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that names used for lookups are non-empty
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first empty field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("container_id", &self.container_id),
            ("target_tag", &self.target_tag),
            ("storage_namespace", &self.storage_namespace),
            ("storage_key", &self.storage_key),
            ("credentials.primary", &self.credentials.primary),
            ("credentials.alias_field", &self.credentials.alias_field),
            ("credentials.secondary", &self.credentials.secondary),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            credentials: CredentialKeys::default(),
            container_id: "awsc-nav-header".to_string(),
            target_tag: "nav".to_string(),
            observed_attributes: vec!["style".to_string(), "class".to_string(), "id".to_string()],
            debounce_ms: 300,
            storage_namespace: "sync".to_string(),
            storage_key: "aliasColors".to_string(),
        }
    }
}
