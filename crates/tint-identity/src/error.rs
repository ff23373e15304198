//! Error types for identity extraction
//!
//! Every variant keeps the raw cookie fragment that failed so callers can
//! log exactly what the page handed over.

use std::string::FromUtf8Error;

/// A credential cookie was present but could not be interpreted
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Percent-decoded bytes were not valid UTF-8
    #[error("cannot percent-decode cookie '{key}': {source}")]
    Decode {
        key: String,
        raw: String,
        #[source]
        source: FromUtf8Error,
    },

    /// A `%` is not followed by two hex digits
    #[error("malformed escape in cookie '{key}' at byte {offset}")]
    MalformedEscape {
        key: String,
        raw: String,
        offset: usize,
    },

    /// Decoded value is not valid JSON
    #[error("invalid JSON in cookie '{key}': {source}")]
    Json {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Decoded JSON is valid but not an object
    #[error("cookie '{key}' does not hold a JSON object")]
    NotAnObject { key: String, raw: String },

    /// Alias field exists but holds something other than a string
    #[error("field '{field}' in cookie '{key}' is not a string")]
    FieldNotString {
        key: String,
        field: String,
        raw: String,
    },
}

impl IdentityError {
    /// Name of the cookie that failed
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Decode { key, .. }
            | Self::MalformedEscape { key, .. }
            | Self::Json { key, .. }
            | Self::NotAnObject { key, .. }
            | Self::FieldNotString { key, .. } => key,
        }
    }

    /// The offending `name=value` fragment as it appeared in the cookie text
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Decode { raw, .. }
            | Self::MalformedEscape { raw, .. }
            | Self::Json { raw, .. }
            | Self::NotAnObject { raw, .. }
            | Self::FieldNotString { raw, .. } => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_cookie() {
        let err = IdentityError::NotAnObject {
            key: "aws-userInfo".to_string(),
            raw: "aws-userInfo=%5B%5D".to_string(),
        };
        assert!(err.to_string().contains("aws-userInfo"));
        assert_eq!(err.key(), "aws-userInfo");
        assert_eq!(err.raw(), "aws-userInfo=%5B%5D");
    }

    #[test]
    fn malformed_escape_reports_offset() {
        let err = IdentityError::MalformedEscape {
            key: "aws-account-alias".to_string(),
            raw: "aws-account-alias=bob%ZZ".to_string(),
            offset: 3,
        };
        assert!(err.to_string().contains("at byte 3"));
        assert_eq!(err.raw(), "aws-account-alias=bob%ZZ");
    }

    #[test]
    fn json_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = IdentityError::Json {
            key: "k".to_string(),
            raw: "k=%7B".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
