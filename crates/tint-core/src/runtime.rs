//! The reconciliation loop
//!
//! Owns the observer task, the settings listener and the debounce slot.
//! Three things trigger a pass:
//! - `start()` itself, once
//! - a mutation batch touching the navigation container, debounced
//! - a storage change to the mapping key, immediately
//!
//! Passes are spawned independently and are not serialized; see
//! [`crate::reconcile`] for why interleaving is harmless.

use crate::debounce::Debouncer;
use crate::mutation::ObserveOptions;
use crate::page::{CookieSource, PageDom};
use crate::reconcile::Reconciler;
use crate::store::{MappingStore, StorageChange};
use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Drives reconciliation passes from page and settings events
pub struct ReconcileLoop<D: PageDom, S, C> {
    reconciler: Arc<Reconciler<D, S, C>>,
    debouncer: Arc<Debouncer>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<D, S, C> ReconcileLoop<D, S, C>
where
    D: PageDom,
    S: MappingStore,
    C: CookieSource,
{
    /// Create loop around a reconciler
    #[must_use]
    pub fn new(reconciler: Reconciler<D, S, C>) -> Self {
        let debouncer = Debouncer::new(reconciler.config().debounce());
        Self {
            reconciler: Arc::new(reconciler),
            debouncer: Arc::new(debouncer),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Reconciler driven by this loop
    #[inline]
    #[must_use]
    pub fn reconciler(&self) -> &Arc<Reconciler<D, S, C>> {
        &self.reconciler
    }

    /// Check if a debounced pass is waiting
    #[inline]
    #[must_use]
    pub fn has_pending_pass(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Check if the loop's tasks are alive
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.lock().iter().any(|task| !task.is_finished())
    }

    /// Start (or restart) the loop
    ///
    /// Runs the initial pass, subscribes to settings changes right away and
    /// attaches the mutation observer on the next animation frame. A prior
    /// observer is disposed first. Must be called within a tokio runtime.
    pub fn start(&self) {
        self.stop();
        info!(
            container = self.reconciler.config().container_id.as_str(),
            "alias tint started"
        );

        // Subscribe before spawning so no change slips in between
        let changes = self.reconciler.store().subscribe();

        let initial = {
            let reconciler = Arc::clone(&self.reconciler);
            tokio::spawn(async move {
                reconciler.reconcile().await;
            })
        };
        let observer = tokio::spawn(watch_mutations(
            Arc::clone(&self.reconciler),
            Arc::clone(&self.debouncer),
        ));
        let settings = tokio::spawn(watch_settings(Arc::clone(&self.reconciler), changes));

        self.tasks.lock().extend([initial, observer, settings]);
    }

    /// Stop observing and drop any pending debounced pass
    pub fn stop(&self) {
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        if tasks.is_empty() {
            return;
        }
        for task in tasks {
            task.abort();
        }
        self.debouncer.cancel();
        debug!("alias tint stopped");
    }

    /// Stop and wait until every loop task has wound down
    ///
    /// Passes already handed off by the debouncer may still finish.
    pub async fn shutdown(&self) {
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        self.debouncer.cancel();
        for task in &tasks {
            task.abort();
        }
        let cancelled = join_all(tasks)
            .await
            .into_iter()
            .filter(|result| matches!(result, Err(err) if err.is_cancelled()))
            .count();
        debug!(cancelled, "alias tint shut down");
    }
}

impl<D: PageDom, S, C> Drop for ReconcileLoop<D, S, C> {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}

impl<D: PageDom, S, C> std::fmt::Debug for ReconcileLoop<D, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcileLoop")
            .field("reconciler", &self.reconciler)
            .field("debouncer", &self.debouncer)
            .field("tasks", &self.tasks.lock().len())
            .finish()
    }
}

async fn watch_mutations<D, S, C>(reconciler: Arc<Reconciler<D, S, C>>, debouncer: Arc<Debouncer>)
where
    D: PageDom,
    S: MappingStore,
    C: CookieSource,
{
    let dom = Arc::clone(reconciler.dom());
    dom.animation_frame().await;
    if !dom.has_body() {
        dom.dom_ready().await;
    }

    let options = ObserveOptions::from_config(reconciler.config());
    let mut batches = match dom.observe(&options) {
        Ok(batches) => batches,
        Err(err) => {
            error!(error = %err, "cannot start mutation observer");
            return;
        }
    };
    debug!("mutation observer started");

    let container = reconciler.config().container_id.clone();
    while let Some(batch) = batches.recv().await {
        if !batch.touches_container(&container) {
            continue;
        }
        debug!(records = batch.len(), "navigation may have changed, debouncing pass");
        let reconciler = Arc::clone(&reconciler);
        debouncer.schedule(async move {
            reconciler.reconcile().await;
        });
    }
    debug!("mutation stream closed");
}

async fn watch_settings<D, S, C>(
    reconciler: Arc<Reconciler<D, S, C>>,
    mut changes: broadcast::Receiver<StorageChange>,
) where
    D: PageDom,
    S: MappingStore,
    C: CookieSource,
{
    let namespace = reconciler.config().storage_namespace.clone();
    let key = reconciler.config().storage_key.clone();

    loop {
        let relevant = match changes.recv().await {
            Ok(change) => change.touches(&namespace, &key),
            Err(RecvError::Lagged(skipped)) => {
                // Missed notifications may have included ours
                warn!(skipped, "lagged storage change notifications");
                true
            }
            Err(RecvError::Closed) => break,
        };
        if relevant {
            debug!("alias colors changed, reconciling");
            let reconciler = Arc::clone(&reconciler);
            tokio::spawn(async move {
                reconciler.reconcile().await;
            });
        }
    }
}
