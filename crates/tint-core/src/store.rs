//! Persistent mapping storage
//!
//! The loop only reads through [`MappingStore::get`]; the settings editor
//! writes through [`MappingStore::set`]. Every successful write is announced
//! on a broadcast channel as a [`StorageChange`], which is how the loop
//! learns that the mapping was edited elsewhere.

use crate::error::StoreError;
use crate::mapping::AliasColors;
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

/// Capacity of change notification channels
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification that keys in a namespace were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Namespace the write happened in
    pub namespace: String,
    /// Keys that were written
    pub changed_keys: Vec<String>,
}

impl StorageChange {
    /// Create change for a single key
    #[inline]
    #[must_use]
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            changed_keys: vec![key.into()],
        }
    }

    /// Check if this change concerns `key` in `namespace`
    #[must_use]
    pub fn touches(&self, namespace: &str, key: &str) -> bool {
        self.namespace == namespace && self.changed_keys.iter().any(|k| k == key)
    }
}

/// Key-value store holding alias mappings
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Read the mapping under `key`, `None` if never written
    async fn get(&self, key: &str) -> Result<Option<AliasColors>, StoreError>;

    /// Replace the mapping under `key`
    async fn set(&self, key: &str, mapping: AliasColors) -> Result<(), StoreError>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

/// In-memory store
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    entries: Mutex<HashMap<String, AliasColors>>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemoryStore {
    /// Create empty store for a namespace
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            namespace: namespace.into(),
            entries: Mutex::new(HashMap::new()),
            changes,
        }
    }

    /// Seed a mapping without emitting a change
    #[must_use]
    pub fn with_mapping(self, key: impl Into<String>, mapping: AliasColors) -> Self {
        self.entries.lock().insert(key.into(), mapping);
        self
    }

    /// Namespace this store reports changes under
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("sync")
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<AliasColors>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, mapping: AliasColors) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), mapping);
        // No subscribers is fine
        let _ = self.changes.send(StorageChange::new(&self.namespace, key));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

/// Store persisted as one JSON object of key → mapping
///
/// A missing file reads as an empty store. Writes rewrite the whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    namespace: String,
    write_lock: tokio::sync::Mutex<()>,
    changes: broadcast::Sender<StorageChange>,
}

impl JsonFileStore {
    /// Create store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            namespace: namespace.into(),
            write_lock: tokio::sync::Mutex::new(()),
            changes,
        }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<IndexMap<String, AliasColors>, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => return Err(StoreError::io_error(&self.path, e)),
        };
        if text.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl MappingStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<AliasColors>, StoreError> {
        Ok(self.read_all().await?.shift_remove(key))
    }

    async fn set(&self, key: &str, mapping: AliasColors) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        all.insert(key.to_string(), mapping);

        let text = serde_json::to_string_pretty(&all)?;
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;

        let _ = self.changes.send(StorageChange::new(&self.namespace, key));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
