//! A page with nothing but the navigation bar
//!
//! Lets a single pass run outside a browser: the bar starts with a computed
//! color and an optional inline color, and mutations never arrive.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tint_core::{DomError, MutationStream, NavElement, ObserveOptions, PageDom};
use tokio::sync::mpsc;

/// Navigation bar held in memory
#[derive(Debug)]
pub struct HeadlessNav {
    inline: Mutex<String>,
    computed: String,
}

impl HeadlessNav {
    pub fn new(computed: impl Into<String>, inline: Option<String>) -> Self {
        Self {
            inline: Mutex::new(inline.unwrap_or_default()),
            computed: computed.into(),
        }
    }
}

impl NavElement for HeadlessNav {
    fn inline_background(&self) -> String {
        self.inline.lock().clone()
    }

    fn computed_background(&self) -> String {
        let inline = self.inline.lock();
        if inline.is_empty() {
            self.computed.clone()
        } else {
            inline.clone()
        }
    }

    fn set_background(&self, color: &str) {
        *self.inline.lock() = color.to_string();
    }
}

/// Page exposing one navigation bar
#[derive(Debug)]
pub struct HeadlessPage {
    nav: Arc<HeadlessNav>,
}

impl HeadlessPage {
    pub fn new(nav: HeadlessNav) -> Self {
        Self { nav: Arc::new(nav) }
    }

    pub fn nav(&self) -> &Arc<HeadlessNav> {
        &self.nav
    }
}

#[async_trait]
impl PageDom for HeadlessPage {
    type Element = HeadlessNav;

    fn query_target(&self, _container_id: &str, _tag: &str) -> Option<Arc<HeadlessNav>> {
        Some(Arc::clone(&self.nav))
    }

    fn has_body(&self) -> bool {
        true
    }

    async fn animation_frame(&self) {}

    async fn dom_ready(&self) {}

    fn observe(&self, _options: &ObserveOptions) -> Result<MutationStream, DomError> {
        // Nothing ever mutates, so the stream is already finished
        let (_, rx) = mpsc::unbounded_channel();
        Ok(rx)
    }
}
