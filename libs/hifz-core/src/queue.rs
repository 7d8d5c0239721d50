//! Due-revision queries over the schedule.
//!
//! Pure read functions over the revision entry map. The engine wraps these
//! with the current time and local day bounds.

use chrono::{DateTime, Duration, Utc};

use crate::types::{QueueStats, RevisionEntry, ScheduleMap};

/// Entries due at `now`, most overdue first. Ties break by verse key so
/// the order is deterministic.
pub fn due_now(entries: &ScheduleMap, now: DateTime<Utc>) -> Vec<RevisionEntry> {
    let mut due: Vec<RevisionEntry> = entries
        .values()
        .filter(|entry| entry.due_date <= now)
        .cloned()
        .collect();
    due.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.key.cmp(&b.key)));
    due
}

/// Entries whose last revision falls within `[start, end)`.
pub fn completed_between(
    entries: &ScheduleMap,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<RevisionEntry> {
    entries
        .values()
        .filter(|entry| {
            entry
                .last_revised
                .is_some_and(|revised| revised >= start && revised < end)
        })
        .cloned()
        .collect()
}

/// The first `limit` due entries, preserving due order.
pub fn suggestions(entries: &ScheduleMap, now: DateTime<Utc>, limit: usize) -> Vec<RevisionEntry> {
    let mut due = due_now(entries, now);
    due.truncate(limit);
    due
}

/// Aggregate schedule statistics; zero defaults when nothing is scheduled.
pub fn stats(entries: &ScheduleMap, now: DateTime<Utc>) -> QueueStats {
    let total = entries.len();
    if total == 0 {
        return QueueStats {
            total_scheduled: 0,
            due_now: 0,
            due_week: 0,
            mean_ease_factor: 0.0,
            mean_interval: 0.0,
        };
    }

    let week = now + Duration::days(7);
    let mut due = 0usize;
    let mut due_week = 0usize;
    let mut ease_sum = 0.0f64;
    let mut interval_sum = 0u64;
    for entry in entries.values() {
        if entry.due_date <= now {
            due += 1;
        }
        if entry.due_date <= week {
            due_week += 1;
        }
        ease_sum += entry.ease_factor;
        interval_sum += entry.interval as u64;
    }

    QueueStats {
        total_scheduled: total,
        due_now: due,
        due_week,
        mean_ease_factor: ease_sum / total as f64,
        mean_interval: interval_sum as f64 / total as f64,
    }
}
