//! The verse progress store: single source of truth for memorization state.
//!
//! Mutations update the in-memory maps synchronously, then issue one
//! asynchronous persistence write per touched document, then fire one
//! change notification. A write gate serializes mutations so
//! read-modify-write sequences never interleave; reads go straight to the
//! in-memory state and observe a mutation immediately, even while its
//! persistence write is still in flight.

use std::sync::RwLock;

use chrono::{DateTime, Local, NaiveDate, Utc};
use hifz_core::{aggregate, MemorizationStatus, RevisionEntry, Sm2, Streak, VerseKey, VerseProgress};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{EngineError, Result};
use crate::notify::{ChangeEvent, ChangeNotifier, Subscription};
use crate::persist::{
    KeyValueStore, ProgressDocument, ScheduleDocument, LAST_ACTIVITY_KEY, PROGRESS_KEY,
    SCHEDULE_KEY, SCHEMA_VERSION, STREAK_COUNT_KEY,
};

/// In-memory engine state; authoritative between persistence writes.
pub(crate) struct EngineState {
    pub(crate) progress: ProgressDocument,
    pub(crate) schedule: ScheduleDocument,
    pub(crate) streak: Streak,
}

/// Which persisted pieces a mutation touched.
#[derive(Clone, Copy, Default)]
pub(crate) struct Touched {
    pub(crate) progress: bool,
    pub(crate) schedule: bool,
    pub(crate) streak: bool,
}

impl Touched {
    pub(crate) fn merge(&mut self, other: Touched) {
        self.progress |= other.progress;
        self.schedule |= other.schedule;
        self.streak |= other.streak;
    }
}

/// Memorization progress store and revision scheduler.
///
/// Constructed explicitly with [`HifzStore::load`] and passed by reference
/// to consumers; there is no process-wide instance.
pub struct HifzStore<S: KeyValueStore> {
    pub(crate) backend: S,
    pub(crate) state: RwLock<EngineState>,
    pub(crate) write_gate: AsyncMutex<()>,
    pub(crate) notifier: ChangeNotifier,
    pub(crate) sm2: Sm2,
}

impl<S: KeyValueStore> HifzStore<S> {
    /// Load state from the backend. Never fails: unreadable or unparseable
    /// documents fall back to empty defaults with a logged warning.
    pub async fn load(backend: S) -> Self {
        let now = Utc::now();

        let progress = match Self::read_json::<ProgressDocument>(&backend, PROGRESS_KEY).await {
            Ok(Some(doc)) if doc.version <= SCHEMA_VERSION => doc,
            Ok(Some(doc)) => {
                tracing::warn!(
                    version = doc.version,
                    "progress document has a newer schema, starting empty"
                );
                ProgressDocument::empty(now)
            }
            Ok(None) => ProgressDocument::empty(now),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load progress document, starting empty");
                ProgressDocument::empty(now)
            }
        };

        let schedule = match Self::read_json::<ScheduleDocument>(&backend, SCHEDULE_KEY).await {
            Ok(Some(doc)) if doc.version <= SCHEMA_VERSION => doc,
            Ok(Some(doc)) => {
                tracing::warn!(
                    version = doc.version,
                    "schedule document has a newer schema, starting empty"
                );
                ScheduleDocument::empty(now)
            }
            Ok(None) => ScheduleDocument::empty(now),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load schedule document, starting empty");
                ScheduleDocument::empty(now)
            }
        };

        let current = match backend.get(STREAK_COUNT_KEY).await {
            Ok(raw) => raw.and_then(|value| value.parse().ok()).unwrap_or(0),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load streak count");
                0
            }
        };
        let last_activity = match backend.get(LAST_ACTIVITY_KEY).await {
            Ok(raw) => raw.and_then(|value| NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load last activity date");
                None
            }
        };

        Self {
            backend,
            state: RwLock::new(EngineState {
                progress,
                schedule,
                streak: Streak {
                    current,
                    last_activity,
                },
            }),
            write_gate: AsyncMutex::new(()),
            notifier: ChangeNotifier::new(),
            sm2: Sm2::default(),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        backend: &S,
        key: &str,
    ) -> Result<Option<T>> {
        let raw = backend.get(key).await.map_err(EngineError::StorageRead)?;
        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|err| EngineError::Validation(err.to_string())),
            None => Ok(None),
        }
    }

    /// Set or clear a verse's memorization state.
    ///
    /// Marking memorized (re)initializes the revision schedule for the
    /// verse, even when it was already memorized. Marking not-started
    /// removes both the progress entry and any schedule entry.
    pub async fn mark_verse(&self, key: VerseKey, status: MemorizationStatus) -> Result<()> {
        self.commit(ChangeEvent::Marked, true, |state, now| {
            Ok((apply_mark(state, &self.sm2, key, status, now), ()))
        })
        .await
    }

    /// Mark many verses at once: one persistence write per touched
    /// document and one notification for the whole batch.
    pub async fn mark_batch(&self, keys: &[VerseKey], status: MemorizationStatus) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.commit(ChangeEvent::Marked, true, |state, now| {
            let mut touched = Touched::default();
            for &key in keys {
                touched.merge(apply_mark(state, &self.sm2, key, status, now));
            }
            Ok((touched, ()))
        })
        .await
    }

    /// Progress for a verse, or None when it has not been started.
    pub fn get_verse(&self, key: VerseKey) -> Option<VerseProgress> {
        self.state
            .read()
            .expect("state lock")
            .progress
            .verses
            .get(&key)
            .cloned()
    }

    /// Current streak state.
    pub fn streak(&self) -> Streak {
        self.state.read().expect("state lock").streak.clone()
    }

    /// Serialize the progress document for backup or sharing.
    pub fn export_snapshot(&self) -> Result<String> {
        let state = self.state.read().expect("state lock");
        Ok(serde_json::to_string(&state.progress)?)
    }

    /// Replace progress state from an exported snapshot.
    ///
    /// The payload must carry a verse map and a supported schema version;
    /// otherwise the existing state is left untouched. Totals are
    /// recomputed from the imported map rather than trusted.
    pub async fn import_snapshot(&self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|err| EngineError::Validation(format!("malformed snapshot: {err}")))?;
        if !value
            .get("verses")
            .is_some_and(serde_json::Value::is_object)
        {
            return Err(EngineError::Validation(
                "snapshot is missing the verse map".to_string(),
            ));
        }
        if let Some(version) = value.get("version").and_then(serde_json::Value::as_u64) {
            if version > SCHEMA_VERSION as u64 {
                return Err(EngineError::Validation(format!(
                    "unsupported snapshot version {version}"
                )));
            }
        }
        let doc: ProgressDocument = serde_json::from_value(value)
            .map_err(|err| EngineError::Validation(format!("malformed snapshot: {err}")))?;

        self.commit(ChangeEvent::Imported, true, move |state, _now| {
            state.progress = doc;
            Ok((
                Touched {
                    progress: true,
                    ..Default::default()
                },
                (),
            ))
        })
        .await
    }

    /// Wipe all progress, schedule, and streak state, in memory and
    /// persisted.
    pub async fn reset(&self) -> Result<()> {
        self.commit(ChangeEvent::Reset, false, |state, now| {
            state.progress = ProgressDocument::empty(now);
            state.schedule = ScheduleDocument::empty(now);
            state.streak = Streak::default();
            Ok((
                Touched {
                    progress: true,
                    schedule: true,
                    streak: true,
                },
                (),
            ))
        })
        .await
    }

    /// Observe committed mutations; the subscription unsubscribes on drop.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// Re-persist the full in-memory state, surfacing write failures.
    pub async fn flush(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let (progress, schedule, streak) = {
            let state = self.state.read().expect("state lock");
            (
                serde_json::to_string(&state.progress)?,
                serde_json::to_string(&state.schedule)?,
                state.streak.clone(),
            )
        };

        self.backend
            .set(PROGRESS_KEY, &progress)
            .await
            .map_err(EngineError::StorageWrite)?;
        self.backend
            .set(SCHEDULE_KEY, &schedule)
            .await
            .map_err(EngineError::StorageWrite)?;
        self.backend
            .set(STREAK_COUNT_KEY, &streak.current.to_string())
            .await
            .map_err(EngineError::StorageWrite)?;
        match streak.last_activity {
            Some(day) => self
                .backend
                .set(LAST_ACTIVITY_KEY, &day.format("%Y-%m-%d").to_string())
                .await
                .map_err(EngineError::StorageWrite)?,
            None => self
                .backend
                .remove(LAST_ACTIVITY_KEY)
                .await
                .map_err(EngineError::StorageWrite)?,
        }
        Ok(())
    }

    /// Run one logical mutation: apply under the write gate, recompute
    /// totals, persist touched documents, notify once.
    pub(crate) async fn commit<F, R>(&self, event: ChangeEvent, activity: bool, apply: F) -> Result<R>
    where
        F: FnOnce(&mut EngineState, DateTime<Utc>) -> Result<(Touched, R)>,
    {
        let _gate = self.write_gate.lock().await;
        let now = Utc::now();
        let today = Local::now().date_naive();

        let (touched, value) = {
            let mut state = self.state.write().expect("state lock");
            let (mut touched, value) = apply(&mut *state, now)?;
            if activity {
                let advanced = state.streak.advance(today);
                if advanced != state.streak {
                    state.streak = advanced;
                    touched.streak = true;
                }
            }
            if touched.progress {
                let (memorized, in_progress) = aggregate::totals(&state.progress.verses);
                state.progress.total_memorized = memorized;
                state.progress.total_in_progress = in_progress;
                state.progress.last_updated = now;
            }
            if touched.schedule {
                state.schedule.last_updated = now;
            }
            (touched, value)
        };

        self.persist(touched).await;
        self.notifier.notify(event);
        Ok(value)
    }

    /// Write touched documents. Failures are logged, never propagated: the
    /// in-memory state stays authoritative until a later write succeeds.
    async fn persist(&self, touched: Touched) {
        let (progress, schedule, streak) = {
            let state = self.state.read().expect("state lock");
            (
                touched
                    .progress
                    .then(|| serde_json::to_string(&state.progress)),
                touched
                    .schedule
                    .then(|| serde_json::to_string(&state.schedule)),
                touched.streak.then(|| state.streak.clone()),
            )
        };

        if let Some(json) = progress {
            self.write_json(PROGRESS_KEY, json).await;
        }
        if let Some(json) = schedule {
            self.write_json(SCHEDULE_KEY, json).await;
        }
        if let Some(streak) = streak {
            if let Err(err) = self
                .backend
                .set(STREAK_COUNT_KEY, &streak.current.to_string())
                .await
            {
                tracing::error!(error = %err, "persistence write failed for streak count");
            }
            let result = match streak.last_activity {
                Some(day) => {
                    self.backend
                        .set(LAST_ACTIVITY_KEY, &day.format("%Y-%m-%d").to_string())
                        .await
                }
                None => self.backend.remove(LAST_ACTIVITY_KEY).await,
            };
            if let Err(err) = result {
                tracing::error!(error = %err, "persistence write failed for last activity date");
            }
        }
    }

    async fn write_json(&self, key: &str, json: serde_json::Result<String>) {
        match json {
            Ok(json) => {
                if let Err(err) = self.backend.set(key, &json).await {
                    tracing::error!(key, error = %err, "persistence write failed");
                }
            }
            Err(err) => tracing::error!(key, error = %err, "document serialization failed"),
        }
    }
}

/// Apply one mark to the in-memory state.
fn apply_mark(
    state: &mut EngineState,
    sm2: &Sm2,
    key: VerseKey,
    status: MemorizationStatus,
    now: DateTime<Utc>,
) -> Touched {
    let mut touched = Touched {
        progress: true,
        ..Default::default()
    };
    match status {
        MemorizationStatus::NotStarted => {
            state.progress.verses.remove(&key);
            if state.schedule.entries.remove(&key).is_some() {
                touched.schedule = true;
            }
        }
        MemorizationStatus::InProgress => {
            let progress = state.progress.verses.entry(key).or_default();
            progress.status = MemorizationStatus::InProgress;
            progress.next_revision_due = None;
        }
        MemorizationStatus::Memorized => {
            let scheduling = sm2.initial(now);
            let progress = state.progress.verses.entry(key).or_default();
            progress.status = MemorizationStatus::Memorized;
            progress.ease_factor = scheduling.ease_factor;
            progress.interval = scheduling.interval;
            progress.next_revision_due = Some(scheduling.due_date);
            let last_revised = progress.last_revised;
            state.schedule.entries.insert(
                key,
                RevisionEntry {
                    key,
                    chapter: key.chapter,
                    verse: key.verse,
                    due_date: scheduling.due_date,
                    interval: scheduling.interval,
                    ease_factor: scheduling.ease_factor,
                    last_revised,
                    status: MemorizationStatus::Memorized,
                },
            );
            touched.schedule = true;
        }
    }
    touched
}
