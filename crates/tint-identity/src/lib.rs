//! Tint Identity - session alias extraction
//!
//! Reads the cookie-like credential text a console page exposes and turns it
//! into a [`Resolution`]:
//! - [`Resolution::Found`] with the alias and which cookie produced it
//! - [`Resolution::NotPresent`] when no credential (or no alias) is available
//! - [`Resolution::ParseError`] when a credential exists but cannot be decoded
//!
//! Two encodings are understood. The primary cookie holds percent-encoded
//! JSON with an `alias` field; the secondary cookie holds a percent-encoded
//! composite string whose first segment is the alias.
//!
//! # Example
//!
//! ```rust
//! use tint_identity::{IdentityResolver, Provenance, Resolution};
//!
//! let resolver = IdentityResolver::default();
//! let cookies = "other=1; aws-userInfo=%7B%22alias%22%3A%22prod-admin%22%7D";
//!
//! match resolver.resolve(cookies) {
//!     Resolution::Found(identity) => {
//!         assert_eq!(identity.alias(), "prod-admin");
//!         assert_eq!(identity.provenance(), Provenance::Primary);
//!     }
//!     other => panic!("unexpected resolution: {other:?}"),
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cookie;
mod error;
mod identity;
mod keys;
mod resolver;

pub use error::IdentityError;
pub use identity::{Provenance, Resolution, SessionIdentity};
pub use keys::CredentialKeys;
pub use resolver::{resolve, IdentityResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
