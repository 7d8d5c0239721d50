//! Daily-activity streak derivation.

use chrono::NaiveDate;

/// Consecutive-day activity counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    pub last_activity: Option<NaiveDate>,
}

impl Streak {
    /// Apply one day's activity. Idempotent within the same day: activity
    /// yesterday extends the streak, activity today leaves it unchanged,
    /// and any gap restarts it at 1.
    pub fn advance(&self, today: NaiveDate) -> Streak {
        let current = match self.last_activity {
            Some(last) if last == today => return self.clone(),
            Some(last) if today.pred_opt() == Some(last) => self.current + 1,
            _ => 1,
        };
        Streak {
            current,
            last_activity: Some(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn first_activity_starts_at_one() {
        let streak = Streak::default().advance(day("2024-06-01"));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.last_activity, Some(day("2024-06-01")));
    }

    #[test]
    fn consecutive_days_increment() {
        let streak = Streak::default()
            .advance(day("2024-06-01"))
            .advance(day("2024-06-02"))
            .advance(day("2024-06-03"));
        assert_eq!(streak.current, 3);
    }

    #[test]
    fn same_day_is_idempotent() {
        let streak = Streak::default()
            .advance(day("2024-06-01"))
            .advance(day("2024-06-01"))
            .advance(day("2024-06-01"));
        assert_eq!(streak.current, 1);
    }

    #[test]
    fn skipping_a_day_resets_to_one() {
        let streak = Streak::default()
            .advance(day("2024-06-01"))
            .advance(day("2024-06-02"))
            .advance(day("2024-06-04"));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.last_activity, Some(day("2024-06-04")));
    }

    #[test]
    fn crosses_month_boundary() {
        let streak = Streak::default()
            .advance(day("2024-05-31"))
            .advance(day("2024-06-01"));
        assert_eq!(streak.current, 2);
    }
}
