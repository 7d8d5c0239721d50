//! Persistence layer: the opaque key-value collaborator and the persisted
//! document schemas.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hifz_core::{ScheduleMap, VerseMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Current persisted-schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Storage key of the progress document.
pub const PROGRESS_KEY: &str = "hifz/progress";
/// Storage key of the revision-schedule document.
pub const SCHEDULE_KEY: &str = "hifz/schedule";
/// Storage key of the streak counter scalar.
pub const STREAK_COUNT_KEY: &str = "hifz/streak_count";
/// Storage key of the last-activity date scalar.
pub const LAST_ACTIVITY_KEY: &str = "hifz/last_activity";

/// Failure reported by the key-value collaborator.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Opaque key-value blob store supplied by the host.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}

/// In-memory store for tests and for embedding without a host backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Persisted progress document: the sparse verse map plus running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDocument {
    pub version: u32,
    pub verses: VerseMap,
    pub total_memorized: u32,
    pub total_in_progress: u32,
    pub last_updated: DateTime<Utc>,
}

impl ProgressDocument {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            verses: VerseMap::new(),
            total_memorized: 0,
            total_in_progress: 0,
            last_updated: now,
        }
    }
}

/// Persisted revision-schedule document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub version: u32,
    pub entries: ScheduleMap,
    pub last_updated: DateTime<Utc>,
}

impl ScheduleDocument {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            entries: ScheduleMap::new(),
            last_updated: now,
        }
    }
}
