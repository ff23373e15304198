//! Scanning of `document.cookie`-style text
//!
//! Pairs are separated by `;` with arbitrary whitespace around them. A
//! single pair without any separator is valid input. Only the first `=`
//! splits name from value, so values may themselves contain `=`.

/// One `name=value` pair borrowed from the cookie text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePair<'a> {
    /// Cookie name
    pub name: &'a str,
    /// Raw (still percent-encoded) value
    pub value: &'a str,
    /// The whole trimmed pair, for diagnostics
    pub raw: &'a str,
}

/// Iterate over well-formed pairs in cookie text
///
/// Fragments without `=` are skipped.
pub fn pairs(text: &str) -> impl Iterator<Item = CookiePair<'_>> {
    text.split(';').map(str::trim).filter_map(|raw| {
        raw.split_once('=')
            .map(|(name, value)| CookiePair { name, value, raw })
    })
}

/// First pair with exactly this name
#[must_use]
pub fn find<'a>(text: &'a str, name: &str) -> Option<CookiePair<'a>> {
    pairs(text).find(|pair| pair.name == name)
}
