//! Subcommand implementations

use crate::headless::{HeadlessNav, HeadlessPage};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tint_core::{
    AliasEntry, AliasSettings, CredentialKeys, Decision, IdentityResolver, JsonFileStore,
    MemoryStore, NavElement, Provenance, Reconciler, Resolution, StaticCookies, TintConfig,
};
use tracing::debug;

/// Outcome of `tint resolve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveReport {
    Found { alias: String, provenance: Provenance },
    NotPresent,
    ParseError { error: String, fragment: String },
}

impl std::fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found { alias, provenance } => write!(f, "alias: {alias} ({provenance})"),
            Self::NotPresent => f.write_str("no identity"),
            Self::ParseError { error, fragment } => {
                write!(f, "parse error: {error} [{fragment}]")
            }
        }
    }
}

/// Outcome of `tint apply`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// `apply`, `reset` or `no_target`
    pub action: String,
    /// Alias that matched, if any
    pub alias: Option<String>,
    /// Why the bar was reset, if it was
    pub reason: Option<String>,
    /// Background after the pass
    pub color: String,
    /// Whether the pass wrote the style
    pub wrote: bool,
}

impl std::fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.action, self.color)?;
        if let Some(alias) = &self.alias {
            write!(f, " (alias {alias})")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " (reason {reason})")?;
        }
        if !self.wrote {
            f.write_str(" [unchanged]")?;
        }
        Ok(())
    }
}

/// Resolve the identity carried by `cookies`
pub fn resolve_cookies(keys: &CredentialKeys, cookies: &str) -> ResolveReport {
    match IdentityResolver::new(keys.clone()).resolve(cookies) {
        Resolution::Found(identity) => ResolveReport::Found {
            alias: identity.alias().to_string(),
            provenance: identity.provenance(),
        },
        Resolution::NotPresent => ResolveReport::NotPresent,
        Resolution::ParseError(err) => ResolveReport::ParseError {
            error: err.to_string(),
            fragment: err.raw().to_string(),
        },
    }
}

/// Run one pass against a headless navigation bar
///
/// Bad cookies or an unreadable store reset the bar rather than failing.
pub async fn apply_once(
    config: &TintConfig,
    store_path: &Path,
    cookies: &str,
    computed: &str,
    current: Option<String>,
) -> ApplyReport {
    debug!(store = %store_path.display(), "running headless pass");
    let page = Arc::new(HeadlessPage::new(HeadlessNav::new(computed, current)));
    let store = Arc::new(JsonFileStore::new(store_path, &config.storage_namespace));
    let reconciler = Reconciler::new(
        config.clone(),
        Arc::clone(&page),
        store,
        Arc::new(StaticCookies::new(cookies)),
    );

    let outcome = reconciler.reconcile().await;
    let (action, alias, reason) = match &outcome.decision {
        Decision::NoTarget => ("no_target", None, None),
        Decision::Apply { identity, .. } => ("apply", Some(identity.alias().to_string()), None),
        Decision::Reset { reason, .. } => ("reset", None, Some(format!("{reason:?}"))),
    };

    ApplyReport {
        action: action.to_string(),
        alias,
        reason,
        color: page.nav().inline_background(),
        wrote: outcome.wrote,
    }
}

fn settings(config: &TintConfig, store_path: &Path) -> AliasSettings<JsonFileStore> {
    let store = Arc::new(JsonFileStore::new(store_path, &config.storage_namespace));
    AliasSettings::new(store, config)
}

/// List configured aliases
///
/// # Errors
/// Fails if the store file cannot be read or parsed
pub async fn list_aliases(config: &TintConfig, store_path: &Path) -> Result<Vec<AliasEntry>> {
    settings(config, store_path)
        .list()
        .await
        .with_context(|| format!("reading aliases from {}", store_path.display()))
}

/// Add or update an alias
///
/// # Errors
/// Fails on a blank alias or if the store file cannot be written
pub async fn add_alias(
    config: &TintConfig,
    store_path: &Path,
    alias: &str,
    color: &str,
) -> Result<Vec<AliasEntry>> {
    settings(config, store_path)
        .upsert(alias, color)
        .await
        .with_context(|| format!("saving alias '{alias}'"))
}

/// Remove an alias, returning whether it existed
///
/// # Errors
/// Fails if the store file cannot be read or written
pub async fn remove_alias(config: &TintConfig, store_path: &Path, alias: &str) -> Result<bool> {
    settings(config, store_path)
        .remove(alias)
        .await
        .with_context(|| format!("deleting alias '{alias}'"))
}

/// Alias the editor would pre-fill for a tab
pub fn suggest_alias(config: &TintConfig, url: &str, cookies: &str) -> Option<String> {
    AliasSettings::new(Arc::new(MemoryStore::default()), config).suggest_alias(url, cookies)
}
