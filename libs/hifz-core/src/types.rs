//! Core types for the Hifz memorization engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Canonical verse identifier, rendered as `chapter:verse` (e.g. "2:255").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseKey {
    pub chapter: u16,
    pub verse: u16,
}

impl VerseKey {
    pub fn new(chapter: u16, verse: u16) -> Self {
        Self { chapter, verse }
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

impl FromStr for VerseKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chapter, verse) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidKey(s.to_string()))?;
        let chapter = chapter
            .parse()
            .map_err(|_| CoreError::InvalidKey(s.to_string()))?;
        let verse = verse
            .parse()
            .map_err(|_| CoreError::InvalidKey(s.to_string()))?;
        Ok(Self { chapter, verse })
    }
}

// Serialized as a string so verse keys work as JSON map keys.
impl Serialize for VerseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VerseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Memorization status of a verse or of a derived unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorizationStatus {
    NotStarted,
    InProgress,
    Memorized,
}

impl Default for MemorizationStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl MemorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Memorized => "memorized",
        }
    }
}

impl FromStr for MemorizationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "memorized" => Ok(Self::Memorized),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Per-verse memorization state.
///
/// A verse whose status is `NotStarted` is not present in the map; absence
/// and not-started are the same thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseProgress {
    pub status: MemorizationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_revised: Option<DateTime<Utc>>,
    pub revision_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_revision_due: Option<DateTime<Utc>>,
    pub ease_factor: f64,
    pub interval: u32,
}

impl Default for VerseProgress {
    fn default() -> Self {
        Self {
            status: MemorizationStatus::NotStarted,
            last_revised: None,
            revision_count: 0,
            next_revision_due: None,
            ease_factor: 2.5,
            interval: 0,
        }
    }
}

/// Scheduled revision for one verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub key: VerseKey,
    pub chapter: u16,
    pub verse: u16,
    pub due_date: DateTime<Utc>,
    pub interval: u32,
    pub ease_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_revised: Option<DateTime<Utc>>,
    pub status: MemorizationStatus,
}

/// Sparse verse map: absent key means not started.
pub type VerseMap = BTreeMap<VerseKey, VerseProgress>;

/// Revision schedule keyed by verse.
pub type ScheduleMap = BTreeMap<VerseKey, RevisionEntry>;

/// Derived progress for one page, chapter, or division. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitProgress {
    pub number: u16,
    pub status: MemorizationStatus,
    pub memorized_count: u32,
    pub total_count: u32,
    pub percentage: f64,
}

/// Aggregate schedule statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStats {
    pub total_scheduled: usize,
    pub due_now: usize,
    pub due_week: usize,
    pub mean_ease_factor: f64,
    pub mean_interval: f64,
}

/// Corpus-wide progress summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStats {
    pub total_verses: u32,
    pub total_memorized: u32,
    pub total_in_progress: u32,
    pub percentage: f64,
    pub chapters_memorized: u32,
    pub divisions_memorized: u32,
    pub due_now: usize,
    pub current_streak: u32,
    pub last_activity: Option<NaiveDate>,
}
