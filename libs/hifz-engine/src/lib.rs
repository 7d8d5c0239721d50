//! Stateful Hifz engine over asynchronous key-value persistence.
//!
//! Provides:
//! - `HifzStore`: the memorization progress store, revision scheduler,
//!   due-revision queries, streak, and aggregate statistics
//! - `KeyValueStore`: the async persistence collaborator, with an
//!   in-memory implementation
//! - Versioned persisted documents and snapshot export/import
//! - Change notifications, one per committed logical mutation
//!
//! The pure domain logic (reference tables, SM-2, aggregation) lives in
//! `hifz-core`; this crate owns state, persistence, and notification.

pub mod error;
pub mod notify;
pub mod persist;
mod revision;
mod stats;
pub mod store;

pub use error::{EngineError, Result};
pub use notify::{ChangeEvent, ChangeNotifier, Subscription};
pub use persist::{
    KeyValueStore, MemoryStore, ProgressDocument, ScheduleDocument, StorageError, SCHEMA_VERSION,
};
pub use store::HifzStore;
