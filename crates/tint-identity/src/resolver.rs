//! Identity resolution from credential cookies

use crate::cookie::{self, CookiePair};
use crate::error::IdentityError;
use crate::identity::{Provenance, Resolution, SessionIdentity};
use crate::keys::CredentialKeys;
use serde_json::Value;
use std::borrow::Cow;

/// Extracts the signed-in alias from cookie text
///
/// The primary cookie is consulted first. The secondary cookie is only
/// read when the primary one is absent altogether; a primary cookie that is
/// present but empty yields [`Resolution::NotPresent`] without falling back.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    keys: CredentialKeys,
}

impl IdentityResolver {
    /// Create resolver for a cookie layout
    #[inline]
    #[must_use]
    pub fn new(keys: CredentialKeys) -> Self {
        Self { keys }
    }

    /// Cookie layout in use
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &CredentialKeys {
        &self.keys
    }

    /// Resolve an identity from the full cookie text
    #[must_use]
    pub fn resolve(&self, cookies: &str) -> Resolution {
        if let Some(pair) = cookie::find(cookies, &self.keys.primary) {
            return self.resolve_primary(pair);
        }
        if let Some(pair) = cookie::find(cookies, &self.keys.secondary) {
            return self.resolve_secondary(pair);
        }
        Resolution::NotPresent
    }

    /// Resolve using only the primary cookie
    #[must_use]
    pub fn resolve_primary_only(&self, cookies: &str) -> Resolution {
        cookie::find(cookies, &self.keys.primary)
            .map_or(Resolution::NotPresent, |pair| self.resolve_primary(pair))
    }

    fn resolve_primary(&self, pair: CookiePair<'_>) -> Resolution {
        if pair.value.is_empty() {
            return Resolution::NotPresent;
        }
        match self.primary_alias(pair) {
            Ok(Some(alias)) => Resolution::Found(SessionIdentity::new(alias, Provenance::Primary)),
            Ok(None) => Resolution::NotPresent,
            Err(err) => Resolution::ParseError(err),
        }
    }

    fn primary_alias(&self, pair: CookiePair<'_>) -> Result<Option<String>, IdentityError> {
        let decoded = decode(pair)?;
        let value: Value = serde_json::from_str(&decoded).map_err(|source| IdentityError::Json {
            key: pair.name.to_string(),
            raw: pair.raw.to_string(),
            source,
        })?;
        let Value::Object(object) = value else {
            return Err(IdentityError::NotAnObject {
                key: pair.name.to_string(),
                raw: pair.raw.to_string(),
            });
        };

        match object.get(&self.keys.alias_field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(alias)) if alias.is_empty() => Ok(None),
            Some(Value::String(alias)) => Ok(Some(alias.clone())),
            Some(_) => Err(IdentityError::FieldNotString {
                key: pair.name.to_string(),
                field: self.keys.alias_field.clone(),
                raw: pair.raw.to_string(),
            }),
        }
    }

    fn resolve_secondary(&self, pair: CookiePair<'_>) -> Resolution {
        let decoded = match decode(pair) {
            Ok(decoded) => decoded,
            Err(err) => return Resolution::ParseError(err),
        };
        let segment = decoded
            .split_once(self.keys.separator)
            .map_or(&*decoded, |(head, _)| head);

        if segment.is_empty() {
            Resolution::NotPresent
        } else {
            Resolution::Found(SessionIdentity::new(segment, Provenance::Secondary))
        }
    }
}

/// Resolve with the default console cookie layout
#[must_use]
pub fn resolve(cookies: &str) -> Resolution {
    IdentityResolver::default().resolve(cookies)
}

fn decode(pair: CookiePair<'_>) -> Result<Cow<'_, str>, IdentityError> {
    if let Some(offset) = malformed_escape(pair.value) {
        return Err(IdentityError::MalformedEscape {
            key: pair.name.to_string(),
            raw: pair.raw.to_string(),
            offset,
        });
    }
    urlencoding::decode(pair.value).map_err(|source| IdentityError::Decode {
        key: pair.name.to_string(),
        raw: pair.raw.to_string(),
        source,
    })
}

/// Byte offset of the first `%` not followed by two hex digits
fn malformed_escape(value: &str) -> Option<usize> {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let well_formed = b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        (!well_formed).then_some(i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn found(resolution: Resolution) -> SessionIdentity {
        match resolution {
            Resolution::Found(identity) => identity,
            other => panic!("expected identity, got {other:?}"),
        }
    }

    #[test]
    fn primary_json_alias() {
        let identity = found(resolve(
            "other=1; aws-userInfo=%7B%22alias%22%3A%22prod-admin%22%7D",
        ));
        assert_eq!(identity.alias(), "prod-admin");
        assert_eq!(identity.provenance(), Provenance::Primary);
    }

    #[test]
    fn primary_alias_keeps_case() {
        let identity = found(resolve("aws-userInfo=%7B%22alias%22%3A%22Prod-Admin%22%7D"));
        assert_eq!(identity.alias(), "Prod-Admin");
    }

    #[test]
    fn secondary_first_segment() {
        let identity = found(resolve("aws-account-alias=bob-extra-data"));
        assert_eq!(identity.alias(), "bob");
        assert_eq!(identity.provenance(), Provenance::Secondary);
    }

    #[test]
    fn secondary_without_separator_is_whole_value() {
        let identity = found(resolve("aws-account-alias=bob"));
        assert_eq!(identity.alias(), "bob");
    }

    #[test]
    fn secondary_value_is_percent_decoded() {
        let identity = found(resolve("aws-account-alias=ops%20team-123"));
        assert_eq!(identity.alias(), "ops team");
    }

    #[test]
    fn secondary_leading_separator_is_not_present() {
        assert!(matches!(
            resolve("aws-account-alias=-rest"),
            Resolution::NotPresent
        ));
        assert!(matches!(resolve("aws-account-alias="), Resolution::NotPresent));
    }

    #[test]
    fn primary_wins_over_secondary() {
        let identity = found(resolve(
            "aws-account-alias=bob-x; aws-userInfo=%7B%22alias%22%3A%22alice%22%7D",
        ));
        assert_eq!(identity.alias(), "alice");
    }

    #[test]
    fn empty_primary_does_not_fall_back() {
        assert!(matches!(
            resolve("aws-userInfo=; aws-account-alias=bob-x"),
            Resolution::NotPresent
        ));
    }

    #[test]
    fn missing_or_empty_alias_field() {
        assert!(matches!(
            resolve("aws-userInfo=%7B%22arn%22%3A%22x%22%7D"),
            Resolution::NotPresent
        ));
        assert!(matches!(
            resolve("aws-userInfo=%7B%22alias%22%3A%22%22%7D"),
            Resolution::NotPresent
        ));
        assert!(matches!(
            resolve("aws-userInfo=%7B%22alias%22%3Anull%7D"),
            Resolution::NotPresent
        ));
    }

    #[test]
    fn no_credentials_at_all() {
        assert!(matches!(resolve(""), Resolution::NotPresent));
        assert!(matches!(resolve("a=1; b=2"), Resolution::NotPresent));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let resolution = resolve("x=1; aws-userInfo=not%20json");
        let Resolution::ParseError(err) = resolution else {
            panic!("expected parse error");
        };
        assert!(matches!(err, IdentityError::Json { .. }));
        assert_eq!(err.raw(), "aws-userInfo=not%20json");
    }

    #[test]
    fn non_object_json_is_parse_error() {
        let resolution = resolve("aws-userInfo=%5B1%2C2%5D");
        assert!(matches!(
            resolution,
            Resolution::ParseError(IdentityError::NotAnObject { .. })
        ));
    }

    #[test]
    fn non_string_alias_is_parse_error() {
        let resolution = resolve("aws-userInfo=%7B%22alias%22%3A42%7D");
        assert!(matches!(
            resolution,
            Resolution::ParseError(IdentityError::FieldNotString { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        assert!(matches!(
            resolve("aws-userInfo=%FF%FE"),
            Resolution::ParseError(IdentityError::Decode { .. })
        ));
        assert!(matches!(
            resolve("aws-account-alias=%C3"),
            Resolution::ParseError(IdentityError::Decode { .. })
        ));
    }

    #[test]
    fn malformed_escape_is_parse_error() {
        let Resolution::ParseError(err) = resolve("aws-account-alias=bob%ZZ-extra") else {
            panic!("expected parse error");
        };
        assert!(matches!(err, IdentityError::MalformedEscape { offset: 3, .. }));
        assert_eq!(err.key(), "aws-account-alias");

        assert!(matches!(
            resolve("aws-userInfo=%7B%22alias%22%3A%22prod%ZZ%22%7D"),
            Resolution::ParseError(IdentityError::MalformedEscape { .. })
        ));
    }

    #[test]
    fn truncated_escape_is_parse_error() {
        assert!(matches!(
            resolve("aws-account-alias=bob%4"),
            Resolution::ParseError(IdentityError::MalformedEscape { offset: 3, .. })
        ));
        assert!(matches!(
            resolve("aws-account-alias=%"),
            Resolution::ParseError(IdentityError::MalformedEscape { offset: 0, .. })
        ));
    }

    #[test]
    fn escape_scan() {
        assert_eq!(malformed_escape("ops%20team%2d1"), None);
        assert_eq!(malformed_escape("plain"), None);
        assert_eq!(malformed_escape("a%g0"), Some(1));
        assert_eq!(malformed_escape("%41%"), Some(3));
    }

    #[test]
    fn custom_layout() {
        let resolver = IdentityResolver::new(
            CredentialKeys::new()
                .with_primary("session")
                .with_alias_field("name")
                .with_secondary("sid")
                .with_separator(':'),
        );
        let identity = found(resolver.resolve("session=%7B%22name%22%3A%22dev%22%7D"));
        assert_eq!(identity.alias(), "dev");

        let identity = found(resolver.resolve("sid=ops%3A999"));
        assert_eq!(identity.alias(), "ops");
    }

    #[test]
    fn primary_only_ignores_secondary() {
        let resolver = IdentityResolver::default();
        assert!(matches!(
            resolver.resolve_primary_only("aws-account-alias=bob-x"),
            Resolution::NotPresent
        ));
    }
}
