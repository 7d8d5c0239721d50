//! Core domain logic for the Hifz memorization engine.
//!
//! Provides:
//! - Static Quran reference tables (verse counts, pages, divisions)
//! - Memorization progress types and hierarchical aggregation
//! - SM-2 style adaptive revision scheduling
//! - Due-revision queries and the daily streak rule
//!
//! Everything here is pure and synchronous; persistence and mutation live
//! in the engine crate.

pub mod aggregate;
pub mod error;
pub mod queue;
pub mod quran;
pub mod sm2;
pub mod streak;
pub mod types;

pub use error::{CoreError, Result};
pub use sm2::{Scheduling, Sm2};
pub use streak::Streak;
pub use types::{
    GlobalStats, MemorizationStatus, QueueStats, RevisionEntry, ScheduleMap, UnitProgress,
    VerseKey, VerseMap, VerseProgress,
};
