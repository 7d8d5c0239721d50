//! Shared fixtures for engine integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hifz_core::VerseKey;
use hifz_engine::{HifzStore, KeyValueStore, MemoryStore, StorageError, Subscription};

/// Fresh engine backed by a private in-memory store.
pub async fn fresh_store() -> HifzStore<MemoryStore> {
    HifzStore::load(MemoryStore::new()).await
}

/// Parse a `chapter:verse` key, panicking on bad test input.
pub fn key(s: &str) -> VerseKey {
    s.parse().expect("test verse key")
}

/// Count notifications fired by the store. Keep the subscription alive for
/// as long as counting should continue.
pub fn count_events<S: KeyValueStore>(
    store: &HifzStore<S>,
) -> (Subscription, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let sub = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (sub, count)
}

/// Backend recording every write, for asserting write coalescing.
#[derive(Clone, Default)]
pub struct CountingStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    sets: Arc<Mutex<Vec<String>>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of set() calls issued against one key.
    pub fn writes_for(&self, key: &str) -> usize {
        self.sets
            .lock()
            .expect("write log lock")
            .iter()
            .filter(|written| written.as_str() == key)
            .count()
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().expect("entries lock").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.sets.lock().expect("write log lock").push(key.to_string());
        self.entries
            .lock()
            .expect("entries lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().expect("entries lock").remove(key);
        Ok(())
    }
}

/// Backend that fails every operation.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError("backend offline".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError("backend offline".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError("backend offline".to_string()))
    }
}
