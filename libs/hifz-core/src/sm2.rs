//! SM-2 style adaptive revision scheduling.
//!
//! Quality ratings (0-5):
//! - 0: total failure, no recall
//! - 1: incorrect, recognized after seeing the verse
//! - 2: incorrect, felt close
//! - 3: correct with serious difficulty
//! - 4: correct after hesitation
//! - 5: perfect recall

use chrono::{DateTime, Duration, Utc};

use crate::error::{CoreError, Result};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 3,
        }
    }
}

/// Outcome of scheduling a verse for its next revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduling {
    pub interval: u32,
    pub ease_factor: f64,
    pub due_date: DateTime<Utc>,
}

impl Sm2 {
    /// Schedule assigned when a verse first becomes memorized.
    pub fn initial(&self, now: DateTime<Utc>) -> Scheduling {
        Scheduling {
            interval: self.first_interval,
            ease_factor: self.initial_ease,
            due_date: now + Duration::days(self.first_interval as i64),
        }
    }

    /// Next schedule after a revision rated `quality` (0-5).
    ///
    /// Failed recall (quality < 3) resets the interval and lowers ease;
    /// successful recall grows the interval through the 1, 3,
    /// round(interval * ease) ladder. Ease never drops below
    /// `minimum_ease`.
    pub fn review(
        &self,
        interval: u32,
        ease_factor: f64,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<Scheduling> {
        if quality > 5 {
            return Err(CoreError::InvalidQuality(quality));
        }

        let (new_interval, new_ease) = if quality < 3 {
            (
                self.first_interval,
                (ease_factor - 0.2).max(self.minimum_ease),
            )
        } else {
            let q = quality as f64;
            let ease = (ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
                .max(self.minimum_ease);
            let next = match interval {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => (interval as f64 * ease).round() as u32,
            };
            (next, ease)
        };

        Ok(Scheduling {
            interval: new_interval,
            ease_factor: new_ease,
            due_date: now + Duration::days(new_interval as i64),
        })
    }

    /// Interval each quality rating 0-5 would produce, without mutating.
    pub fn preview(&self, interval: u32, ease_factor: f64) -> [u32; 6] {
        let now = Utc::now();
        let mut intervals = [0u32; 6];
        for (quality, slot) in intervals.iter_mut().enumerate() {
            if let Ok(scheduling) = self.review(interval, ease_factor, quality as u8, now) {
                *slot = scheduling.interval;
            }
        }
        intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn rejects_quality_above_five() {
        let sm2 = Sm2::default();
        assert_eq!(
            sm2.review(1, 2.5, 6, now()),
            Err(CoreError::InvalidQuality(6))
        );
    }

    #[test]
    fn failed_recall_resets_interval() {
        let sm2 = Sm2::default();
        for quality in 0..3 {
            let result = sm2.review(30, 2.5, quality, now()).unwrap();
            assert_eq!(result.interval, 1);
        }
    }

    #[test]
    fn failed_recall_lowers_ease() {
        let sm2 = Sm2::default();
        let result = sm2.review(10, 2.5, 1, now()).unwrap();
        assert!((result.ease_factor - 2.3).abs() < 1e-9);
    }

    #[test]
    fn ease_never_drops_below_minimum() {
        let sm2 = Sm2::default();
        let mut ease = 2.5;
        for _ in 0..20 {
            ease = sm2.review(5, ease, 0, now()).unwrap().ease_factor;
            assert!(ease >= sm2.minimum_ease);
        }
        assert_eq!(ease, sm2.minimum_ease);

        // hard successes converge to the floor as well
        let mut ease = 1.35;
        for _ in 0..10 {
            ease = sm2.review(5, ease, 3, now()).unwrap().ease_factor;
            assert!(ease >= sm2.minimum_ease);
        }
    }

    #[test]
    fn interval_ladder_on_success() {
        let sm2 = Sm2::default();

        let from_zero = sm2.review(0, 2.5, 4, now()).unwrap();
        assert_eq!(from_zero.interval, 1);

        let from_one = sm2.review(1, 2.5, 4, now()).unwrap();
        assert_eq!(from_one.interval, 3);

        let grown = sm2.review(10, 2.5, 5, now()).unwrap();
        // 10 * 2.6 = 26
        assert_eq!(grown.interval, 26);
    }

    #[test]
    fn perfect_then_failed_revision_cycle() {
        let sm2 = Sm2::default();
        let at = now();

        let initial = sm2.initial(at);
        assert_eq!(initial.interval, 1);
        assert_eq!(initial.ease_factor, 2.5);
        assert_eq!(initial.due_date, at + Duration::days(1));

        let perfect = sm2
            .review(initial.interval, initial.ease_factor, 5, at)
            .unwrap();
        assert!((perfect.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(perfect.interval, 3);
        assert_eq!(perfect.due_date, at + Duration::days(3));

        let failed = sm2
            .review(perfect.interval, perfect.ease_factor, 1, at)
            .unwrap();
        assert_eq!(failed.interval, 1);
        assert!((failed.ease_factor - 2.4).abs() < 1e-9);
    }

    #[test]
    fn preview_matches_review() {
        let sm2 = Sm2::default();
        let at = now();
        let intervals = sm2.preview(10, 2.2);
        for quality in 0..=5u8 {
            let expected = sm2.review(10, 2.2, quality, at).unwrap().interval;
            assert_eq!(intervals[quality as usize], expected);
        }
    }
}
