//! Alias → color mapping
//!
//! Keys keep the case the user typed. Lookups ignore case. Iteration order
//! is insertion order (document order when deserialized), and a lookup
//! returns the first case-insensitive match in that order. When the user
//! configured both `Foo` and `foo`, whichever was stored first wins; this
//! tie-break is implementation-defined.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tint_identity::SessionIdentity;

/// Mapping from configured alias to an opaque color string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasColors(IndexMap<String, String>);

/// Result of looking an identity up in the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMatch<'a> {
    /// Configured alias that matched
    pub alias: &'a str,
    /// Its color
    pub color: &'a str,
}

impl AliasColors {
    /// Create empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured aliases
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing is configured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Color stored under this exact key
    #[inline]
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    /// Set color for an exact key, keeping its position if it already exists
    pub fn insert(&mut self, alias: impl Into<String>, color: impl Into<String>) -> Option<String> {
        self.0.insert(alias.into(), color.into())
    }

    /// Remove an exact key, preserving the order of the rest
    pub fn remove(&mut self, alias: &str) -> Option<String> {
        self.0.shift_remove(alias)
    }

    /// Iterate in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First entry whose alias equals `alias` ignoring case
    #[must_use]
    pub fn lookup_alias(&self, alias: &str) -> Option<ColorMatch<'_>> {
        let wanted = alias.to_lowercase();
        self.0
            .iter()
            .find(|(configured, _)| configured.to_lowercase() == wanted)
            .map(|(configured, color)| ColorMatch {
                alias: configured,
                color,
            })
    }

    /// First entry matching the session identity
    #[inline]
    #[must_use]
    pub fn lookup(&self, identity: &SessionIdentity) -> Option<ColorMatch<'_>> {
        self.lookup_alias(identity.alias())
    }

    /// Entries sorted by alias, ignoring case, for display
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(a, _), (b, _)| compare_alias(a, b));
        entries
    }
}

fn compare_alias(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasColors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tint_identity::Provenance;

    #[test]
    fn lookup_ignores_case() {
        let colors: AliasColors = [("Prod-Admin", "#ff0000")].into_iter().collect();
        let identity = SessionIdentity::new("prod-admin", Provenance::Primary);
        let found = colors.lookup(&identity).unwrap();
        assert_eq!(found.alias, "Prod-Admin");
        assert_eq!(found.color, "#ff0000");
    }

    #[test]
    fn lookup_miss() {
        let colors: AliasColors = [("dev", "green")].into_iter().collect();
        assert!(colors.lookup_alias("prod").is_none());
        assert!(AliasColors::new().lookup_alias("dev").is_none());
    }

    #[test]
    fn duplicate_case_first_in_order_wins() {
        let colors: AliasColors = [("Foo", "red"), ("foo", "blue")].into_iter().collect();
        assert_eq!(colors.lookup_alias("FOO").unwrap().color, "red");

        let colors: AliasColors = [("foo", "blue"), ("Foo", "red")].into_iter().collect();
        assert_eq!(colors.lookup_alias("FOO").unwrap().color, "blue");
    }

    #[test]
    fn json_keeps_document_order() {
        let colors: AliasColors =
            serde_json::from_str(r##"{"zeta": "#000", "Zeta": "#fff", "alpha": "#111"}"##).unwrap();
        let keys: Vec<_> = colors.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "Zeta", "alpha"]);
        assert_eq!(colors.lookup_alias("ZETA").unwrap().color, "#000");
    }

    #[test]
    fn insert_existing_keeps_position_and_remove_keeps_order() {
        let mut colors: AliasColors = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(colors.insert("a", "9"), Some("1".to_string()));
        assert_eq!(colors.iter().next(), Some(("a", "9")));

        assert_eq!(colors.remove("b"), Some("2".to_string()));
        let keys: Vec<_> = colors.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert!(colors.remove("B").is_none());
    }

    #[test]
    fn sorted_ignores_case() {
        let colors: AliasColors = [("beta", "1"), ("Alpha", "2"), ("gamma", "3")]
            .into_iter()
            .collect();
        let order: Vec<_> = colors.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["Alpha", "beta", "gamma"]);
    }

    proptest! {
        #[test]
        fn prop_lookup_returns_first_case_insensitive_match(
            entries in proptest::collection::vec(("[a-cA-C]{1,3}", "#[0-9a-f]{6}"), 0..12),
            probe in "[a-cA-C]{1,3}",
        ) {
            let colors: AliasColors = entries.iter().cloned().collect();
            let expected = colors
                .iter()
                .find(|(k, _)| k.to_lowercase() == probe.to_lowercase())
                .map(|(_, v)| v.to_string());
            let actual = colors.lookup_alias(&probe).map(|m| m.color.to_string());
            prop_assert_eq!(actual, expected);
        }
    }
}
