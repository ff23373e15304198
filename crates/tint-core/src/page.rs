//! Page-side collaborators
//!
//! A page adapter implements [`PageDom`] (element lookup, readiness and
//! mutation delivery), [`NavElement`] (style access on the navigation bar)
//! and [`CookieSource`] (the credential text). All reads are synchronous
//! except the two readiness waits.

use crate::error::DomError;
use crate::mutation::{MutationBatch, ObserveOptions};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Stream of mutation batches; dropping it disconnects the observer
pub type MutationStream = mpsc::UnboundedReceiver<MutationBatch>;

/// The navigation element whose background is managed
pub trait NavElement: Send + Sync {
    /// Inline `background-color`, empty when unset
    fn inline_background(&self) -> String;

    /// Computed `background-color`
    fn computed_background(&self) -> String;

    /// Write inline `background-color`
    fn set_background(&self, color: &str);
}

/// Access to the hosting document
#[async_trait]
pub trait PageDom: Send + Sync + 'static {
    /// Concrete element handle
    type Element: NavElement + 'static;

    /// Find `tag` inside the element with id `container_id`
    ///
    /// Each call may return a different instance when the page replaced the
    /// element; identity is the `Arc` allocation.
    fn query_target(&self, container_id: &str, tag: &str) -> Option<Arc<Self::Element>>;

    /// Check if the document body exists yet
    fn has_body(&self) -> bool;

    /// Resolve on the next animation frame
    async fn animation_frame(&self);

    /// Resolve once the document has finished parsing
    async fn dom_ready(&self);

    /// Subscribe to mutations under the body
    ///
    /// # Errors
    /// - `DomError::NoBody` if there is no body to observe
    fn observe(&self, options: &ObserveOptions) -> Result<MutationStream, DomError>;
}

/// Source of the page's cookie text
pub trait CookieSource: Send + Sync + 'static {
    /// Current `name=value; ...` text
    fn cookie_text(&self) -> String;
}

/// Fixed cookie text
#[derive(Debug, Clone, Default)]
pub struct StaticCookies(pub String);

impl StaticCookies {
    /// Create from text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl CookieSource for StaticCookies {
    fn cookie_text(&self) -> String {
        self.0.clone()
    }
}
