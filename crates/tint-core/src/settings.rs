//! Alias settings editor
//!
//! Backs the options UI: list the configured aliases, add or update one,
//! delete one, and suggest the alias of the console tab the user is on.
//! Writes go through the same [`MappingStore`] the loop reads, so every
//! edit reaches open pages through the store's change notifications.

use crate::config::TintConfig;
use crate::error::SettingsError;
use crate::mapping::AliasColors;
use crate::store::MappingStore;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tint_identity::{IdentityResolver, Resolution};
use tracing::{debug, info};

static CONSOLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://.*\.console\.aws(\.amazon)?\.com/").expect("console URL pattern is valid")
});

/// Check if `url` points into the cloud console
#[must_use]
pub fn is_console_url(url: &str) -> bool {
    CONSOLE_URL.is_match(url)
}

/// One configured alias, as listed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Alias as typed
    pub alias: String,
    /// Color string
    pub color: String,
}

/// Settings service over a mapping store
#[derive(Debug)]
pub struct AliasSettings<S> {
    store: Arc<S>,
    key: String,
    resolver: IdentityResolver,
}

impl<S: MappingStore> AliasSettings<S> {
    /// Create service using the configured storage key and cookie layout
    #[must_use]
    pub fn new(store: Arc<S>, config: &TintConfig) -> Self {
        Self {
            store,
            key: config.storage_key.clone(),
            resolver: IdentityResolver::new(config.credentials.clone()),
        }
    }

    /// Current mapping, empty if never written
    ///
    /// # Errors
    /// - `SettingsError::Store` if the store cannot be read
    pub async fn mapping(&self) -> Result<AliasColors, SettingsError> {
        Ok(self.store.get(&self.key).await?.unwrap_or_default())
    }

    /// Configured aliases sorted by name, ignoring case
    ///
    /// # Errors
    /// - `SettingsError::Store` if the store cannot be read
    pub async fn list(&self) -> Result<Vec<AliasEntry>, SettingsError> {
        Ok(entries(&self.mapping().await?))
    }

    /// Set the color for an alias and return the updated listing
    ///
    /// The alias is trimmed and stored under that exact spelling. A second
    /// spelling differing only in case becomes a separate entry.
    ///
    /// # Errors
    /// - `SettingsError::EmptyAlias` if the alias is blank
    /// - `SettingsError::Store` if the store cannot be read or written
    pub async fn upsert(&self, alias: &str, color: &str) -> Result<Vec<AliasEntry>, SettingsError> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(SettingsError::EmptyAlias);
        }

        let mut mapping = self.mapping().await?;
        mapping.insert(alias, color);
        self.store.set(&self.key, mapping.clone()).await?;

        info!(alias, color, "saved alias color");
        Ok(entries(&mapping))
    }

    /// Delete an alias by exact spelling, returning whether it existed
    ///
    /// # Errors
    /// - `SettingsError::Store` if the store cannot be read or written
    pub async fn remove(&self, alias: &str) -> Result<bool, SettingsError> {
        let mut mapping = self.mapping().await?;
        if mapping.remove(alias).is_none() {
            debug!(alias, "alias not configured, nothing to delete");
            return Ok(false);
        }
        self.store.set(&self.key, mapping).await?;

        info!(alias, "deleted alias color");
        Ok(true)
    }

    /// Alias to pre-fill the editor with, from the tab's primary credential
    #[must_use]
    pub fn suggest_alias(&self, url: &str, cookies: &str) -> Option<String> {
        if !is_console_url(url) {
            return None;
        }
        match self.resolver.resolve_primary_only(cookies) {
            Resolution::Found(identity) => Some(identity.alias().to_string()),
            Resolution::NotPresent => None,
            Resolution::ParseError(err) => {
                debug!(error = %err, "cannot suggest alias");
                None
            }
        }
    }
}

fn entries(mapping: &AliasColors) -> Vec<AliasEntry> {
    mapping
        .sorted()
        .into_iter()
        .map(|(alias, color)| AliasEntry {
            alias: alias.to_string(),
            color: color.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn settings() -> (AliasSettings<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (AliasSettings::new(Arc::clone(&store), &TintConfig::default()), store)
    }

    fn aliases(list: &[AliasEntry]) -> Vec<&str> {
        list.iter().map(|e| e.alias.as_str()).collect()
    }

    #[test]
    fn console_urls() {
        assert!(is_console_url("https://us-east-1.console.aws.amazon.com/ec2/home"));
        assert!(is_console_url("https://eu-west-1.console.aws.com/"));
        assert!(is_console_url("http://x.console.aws.amazon.com/"));
        assert!(!is_console_url("https://console.aws.amazon.com/"));
        assert!(!is_console_url("https://example.com/console.aws.amazon.com/"));
        assert!(!is_console_url("ftp://x.console.aws.amazon.com/"));
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (settings, _) = settings();
        assert!(settings.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_trims_and_sorts() {
        let (settings, store) = settings();
        settings.upsert("  zeta ", "#000").await.unwrap();
        let list = settings.upsert("Alpha", "#fff").await.unwrap();
        assert_eq!(aliases(&list), vec!["Alpha", "zeta"]);

        let stored = store.get("aliasColors").await.unwrap().unwrap();
        assert_eq!(stored.get("zeta"), Some("#000"));
    }

    #[tokio::test]
    async fn upsert_updates_existing() {
        let (settings, _) = settings();
        settings.upsert("prod", "red").await.unwrap();
        let list = settings.upsert("prod", "blue").await.unwrap();
        assert_eq!(list, vec![AliasEntry { alias: "prod".into(), color: "blue".into() }]);
    }

    #[tokio::test]
    async fn upsert_keeps_case_variants_separate() {
        let (settings, _) = settings();
        settings.upsert("Foo", "red").await.unwrap();
        let list = settings.upsert("foo", "blue").await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn blank_alias_rejected() {
        let (settings, store) = settings();
        assert!(matches!(
            settings.upsert("   ", "red").await,
            Err(SettingsError::EmptyAlias)
        ));
        assert!(store.get("aliasColors").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_existing_and_missing() {
        let (settings, store) = settings();
        settings.upsert("prod", "red").await.unwrap();
        let mut changes = store.subscribe();

        assert!(!settings.remove("PROD").await.unwrap());
        assert!(changes.try_recv().is_err());

        assert!(settings.remove("prod").await.unwrap());
        assert!(changes.try_recv().is_ok());
        assert!(settings.list().await.unwrap().is_empty());
    }

    #[test]
    fn suggests_alias_on_console_tab() {
        let (settings, _) = settings();
        let cookies = "aws-userInfo=%7B%22alias%22%3A%22Prod-Admin%22%7D";
        assert_eq!(
            settings.suggest_alias("https://us-east-1.console.aws.amazon.com/", cookies),
            Some("Prod-Admin".to_string())
        );
        assert_eq!(settings.suggest_alias("https://example.com/", cookies), None);
        assert_eq!(
            settings.suggest_alias(
                "https://us-east-1.console.aws.amazon.com/",
                "aws-account-alias=bob-x"
            ),
            None
        );
        assert_eq!(
            settings.suggest_alias("https://a.console.aws.amazon.com/", "aws-userInfo=%7B"),
            None
        );
    }
}
