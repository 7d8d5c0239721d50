//! Revision recording and due-queue queries on the store.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, Utc};
use hifz_core::{queue, MemorizationStatus, QueueStats, RevisionEntry, VerseKey};

use crate::error::Result;
use crate::notify::ChangeEvent;
use crate::persist::KeyValueStore;
use crate::store::{HifzStore, Touched};

impl<S: KeyValueStore> HifzStore<S> {
    /// Record a revision outcome for a verse and reschedule it.
    ///
    /// Quality runs 0-5; anything above 5 is rejected without touching
    /// state. A verse with no schedule entry yet is scheduled from scratch
    /// (ease 2.5, interval 0). When the verse is present in the progress
    /// map, its mirrored scheduling fields are kept consistent.
    pub async fn record_revision(&self, key: VerseKey, quality: u8) -> Result<RevisionEntry> {
        self.commit(ChangeEvent::Revised, true, |state, now| {
            let (interval, ease_factor) = state
                .schedule
                .entries
                .get(&key)
                .map(|entry| (entry.interval, entry.ease_factor))
                .unwrap_or((0, self.sm2.initial_ease));
            let scheduling = self.sm2.review(interval, ease_factor, quality, now)?;

            let mut touched = Touched {
                schedule: true,
                ..Default::default()
            };

            let status = state
                .progress
                .verses
                .get(&key)
                .map(|progress| progress.status)
                .unwrap_or(MemorizationStatus::Memorized);
            let entry = state
                .schedule
                .entries
                .entry(key)
                .or_insert_with(|| RevisionEntry {
                    key,
                    chapter: key.chapter,
                    verse: key.verse,
                    due_date: scheduling.due_date,
                    interval: scheduling.interval,
                    ease_factor: scheduling.ease_factor,
                    last_revised: None,
                    status,
                });
            entry.due_date = scheduling.due_date;
            entry.interval = scheduling.interval;
            entry.ease_factor = scheduling.ease_factor;
            entry.last_revised = Some(now);
            let updated = entry.clone();

            if let Some(progress) = state.progress.verses.get_mut(&key) {
                progress.last_revised = Some(now);
                progress.revision_count += 1;
                progress.next_revision_due = Some(scheduling.due_date);
                progress.ease_factor = scheduling.ease_factor;
                progress.interval = scheduling.interval;
                touched.progress = true;
            }

            Ok((touched, updated))
        })
        .await
    }

    /// Intervals each quality rating would produce for this verse.
    pub fn preview_intervals(&self, key: VerseKey) -> [u32; 6] {
        let state = self.state.read().expect("state lock");
        let (interval, ease_factor) = state
            .schedule
            .entries
            .get(&key)
            .map(|entry| (entry.interval, entry.ease_factor))
            .unwrap_or((0, self.sm2.initial_ease));
        self.sm2.preview(interval, ease_factor)
    }

    /// Entries due now, most overdue first.
    pub fn due_now(&self) -> Vec<RevisionEntry> {
        let state = self.state.read().expect("state lock");
        queue::due_now(&state.schedule.entries, Utc::now())
    }

    /// Entries revised today, in local calendar time.
    pub fn completed_today(&self) -> Vec<RevisionEntry> {
        let today = Local::now().date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let state = self.state.read().expect("state lock");
        queue::completed_between(
            &state.schedule.entries,
            local_midnight(today),
            local_midnight(tomorrow),
        )
    }

    /// The first `limit` due entries, preserving due order.
    pub fn suggestions(&self, limit: usize) -> Vec<RevisionEntry> {
        let state = self.state.read().expect("state lock");
        queue::suggestions(&state.schedule.entries, Utc::now(), limit)
    }

    /// Aggregate schedule statistics.
    pub fn queue_stats(&self) -> QueueStats {
        let state = self.state.read().expect("state lock");
        queue::stats(&state.schedule.entries, Utc::now())
    }
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
