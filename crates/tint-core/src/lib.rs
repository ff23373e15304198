//! Tint Core - navigation bar reconciliation
//!
//! Keeps the console navigation bar painted with the color configured for
//! the signed-in account alias:
//! - [`Reconciler`] runs one pass: locate the bar, capture its baseline,
//!   resolve the alias, look up its color and write only when it differs
//! - [`ReconcileLoop`] drives passes from startup, debounced page mutations
//!   and settings changes
//! - [`AliasSettings`] edits the alias → color mapping
//!
//! The page, cookie jar and storage are reached through the [`PageDom`],
//! [`CookieSource`] and [`MappingStore`] traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tint_core::{MemoryStore, ReconcileLoop, Reconciler, TintConfig};
//!
//! # async fn example(page: Arc<MyPage>, cookies: Arc<MyCookies>) {
//! let store = Arc::new(MemoryStore::default());
//! let reconciler = Reconciler::new(TintConfig::new(), page, store, cookies);
//!
//! let tint = ReconcileLoop::new(reconciler);
//! tint.start();
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod baseline;
pub mod config;
pub mod debounce;
pub mod error;
pub mod mapping;
pub mod mutation;
pub mod page;
pub mod reconcile;
pub mod runtime;
pub mod settings;
pub mod store;

// Re-exports for convenience
pub use baseline::BaselineMemo;
pub use config::TintConfig;
pub use debounce::Debouncer;
pub use error::{ConfigError, DomError, SettingsError, StoreError};
pub use mapping::{AliasColors, ColorMatch};
pub use mutation::{MutationBatch, MutationKind, MutationRecord, NodeSummary, ObserveOptions};
pub use page::{CookieSource, MutationStream, NavElement, PageDom, StaticCookies};
pub use reconcile::{Decision, PassOutcome, PassStats, Reconciler, ResetReason};
pub use runtime::ReconcileLoop;
pub use settings::{is_console_url, AliasEntry, AliasSettings};
pub use store::{JsonFileStore, MappingStore, MemoryStore, StorageChange};
pub use tint_identity::{
    CredentialKeys, IdentityError, IdentityResolver, Provenance, Resolution, SessionIdentity,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring a page into the loop
    pub use crate::{
        AliasColors, CookieSource, MappingStore, NavElement, PageDom, ReconcileLoop, Reconciler,
        TintConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
