//! Testing utilities for Alias Tint
//!
//! Scripted stand-ins for the page, the navigation element, the cookie jar
//! and a broken store, plus fixtures for cookie text and mutation batches.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tint_core::{
    AliasColors, CookieSource, DomError, MappingStore, MutationBatch, MutationRecord,
    MutationStream, NavElement, NodeSummary, ObserveOptions, PageDom, StorageChange, StoreError,
};
use tokio::sync::{broadcast, mpsc, watch};

pub const NAV_CONTAINER: &str = "awsc-nav-header";

/// Primary credential cookie carrying `alias`
pub fn primary_cookie(alias: &str) -> String {
    let json = serde_json::json!({ "alias": alias, "arn": "arn:aws:iam::123456789012:user/test" });
    format!("aws-userInfo={}", urlencoding::encode(&json.to_string()))
}

/// Mutation batch touching the navigation container
pub fn nav_batch() -> MutationBatch {
    MutationBatch::new(vec![MutationRecord::attribute(
        NodeSummary::element().with_ancestors(["body", NAV_CONTAINER]),
        "class",
    )])
}

/// Mutation batch elsewhere on the page
pub fn unrelated_batch() -> MutationBatch {
    MutationBatch::new(vec![MutationRecord::child_list(
        NodeSummary::element_with_id("main"),
        vec![NodeSummary::element().with_descendants(["content"])],
    )])
}

#[derive(Debug, Default)]
pub struct FakeNav {
    inline: Mutex<String>,
    computed: Mutex<String>,
    writes: AtomicUsize,
    history: Mutex<Vec<String>>,
}

impl FakeNav {
    pub fn new(computed: &str) -> Self {
        Self {
            computed: Mutex::new(computed.to_string()),
            ..Self::default()
        }
    }

    pub fn with_inline(self, color: &str) -> Self {
        *self.inline.lock() = color.to_string();
        self
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Simulate the page restyling the element behind our back
    pub fn set_computed(&self, color: &str) {
        *self.computed.lock() = color.to_string();
    }
}

impl NavElement for FakeNav {
    fn inline_background(&self) -> String {
        self.inline.lock().clone()
    }

    fn computed_background(&self) -> String {
        let inline = self.inline.lock();
        if inline.is_empty() {
            self.computed.lock().clone()
        } else {
            inline.clone()
        }
    }

    fn set_background(&self, color: &str) {
        *self.inline.lock() = color.to_string();
        self.history.lock().push(color.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scriptable page
#[derive(Debug)]
pub struct FakePage {
    nav: Mutex<Option<Arc<FakeNav>>>,
    body: AtomicBool,
    ready: watch::Sender<bool>,
    observer: Mutex<Option<mpsc::UnboundedSender<MutationBatch>>>,
    observe_calls: AtomicUsize,
    last_options: Mutex<Option<ObserveOptions>>,
}

impl FakePage {
    /// Loaded page with a navigation bar
    pub fn with_nav(nav: FakeNav) -> (Arc<Self>, Arc<FakeNav>) {
        let page = Self::empty();
        let nav = page.replace_nav(nav);
        (Arc::new(page), nav)
    }

    /// Loaded page without a navigation bar
    pub fn empty() -> Self {
        let (ready, _) = watch::channel(true);
        Self {
            nav: Mutex::new(None),
            body: AtomicBool::new(true),
            ready,
            observer: Mutex::new(None),
            observe_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// Page still parsing: no body until [`FakePage::finish_loading`]
    pub fn loading() -> Self {
        let page = Self::empty();
        page.body.store(false, Ordering::SeqCst);
        page.ready.send_replace(false);
        page
    }

    pub fn finish_loading(&self) {
        self.body.store(true, Ordering::SeqCst);
        self.ready.send_replace(true);
    }

    /// Swap in a new navigation element instance
    pub fn replace_nav(&self, nav: FakeNav) -> Arc<FakeNav> {
        let nav = Arc::new(nav);
        *self.nav.lock() = Some(Arc::clone(&nav));
        nav
    }

    pub fn remove_nav(&self) {
        self.nav.lock().take();
    }

    /// Deliver a batch to the attached observer, false if none is attached
    pub fn emit(&self, batch: MutationBatch) -> bool {
        self.observer
            .lock()
            .as_ref()
            .is_some_and(|tx| tx.send(batch).is_ok())
    }

    pub fn is_observed(&self) -> bool {
        self.observer.lock().as_ref().is_some_and(|tx| !tx.is_closed())
    }

    pub fn observe_calls(&self) -> usize {
        self.observe_calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<ObserveOptions> {
        self.last_options.lock().clone()
    }
}

#[async_trait]
impl PageDom for FakePage {
    type Element = FakeNav;

    fn query_target(&self, container_id: &str, tag: &str) -> Option<Arc<FakeNav>> {
        if container_id != NAV_CONTAINER || tag != "nav" {
            return None;
        }
        self.nav.lock().clone()
    }

    fn has_body(&self) -> bool {
        self.body.load(Ordering::SeqCst)
    }

    async fn animation_frame(&self) {
        tokio::task::yield_now().await;
    }

    async fn dom_ready(&self) {
        let mut ready = self.ready.subscribe();
        // Sender lives in self, so this only ends once ready
        let _ = ready.wait_for(|ready| *ready).await;
    }

    fn observe(&self, options: &ObserveOptions) -> Result<MutationStream, DomError> {
        self.observe_calls.fetch_add(1, Ordering::SeqCst);
        if !self.has_body() {
            return Err(DomError::NoBody);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.observer.lock() = Some(tx);
        *self.last_options.lock() = Some(options.clone());
        Ok(rx)
    }
}

/// Cookie jar whose text can change between reads
#[derive(Debug, Default)]
pub struct FakeCookies(Mutex<String>);

impl FakeCookies {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Mutex::new(text.into()))
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.0.lock() = text.into();
    }
}

impl CookieSource for FakeCookies {
    fn cookie_text(&self) -> String {
        self.0.lock().clone()
    }
}

/// Store whose reads always fail
#[derive(Debug)]
pub struct FailingStore {
    changes: broadcast::Sender<StorageChange>,
    reads: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            changes: broadcast::channel(16).0,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Announce a change without any data behind it
    pub fn notify(&self, change: StorageChange) {
        let _ = self.changes.send(change);
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<AliasColors>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    async fn set(&self, _key: &str, _mapping: AliasColors) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
