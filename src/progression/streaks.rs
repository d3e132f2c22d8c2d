//! Global completion streak
//!
//! Tracks consecutive calendar days on which at least one completion happened.

use chrono::NaiveDate;

use crate::domain::Streak;

/// What a completion did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// First completion ever, or the chain was broken
    Started,
    /// Last completion was yesterday
    Extended,
    /// Today was already credited
    AlreadyCounted,
}

/// Credit a completion on `today`.
///
/// Increments when the last credited day was yesterday, keeps the count when it
/// was today, and restarts at 1 otherwise. `last_date` is always stamped.
pub fn advance(streak: &mut Streak, today: NaiveDate) -> StreakChange {
    let yesterday = today.pred_opt();
    let change = match streak.last_date {
        Some(last) if last == today => StreakChange::AlreadyCounted,
        Some(last) if Some(last) == yesterday => {
            streak.count += 1;
            StreakChange::Extended
        }
        _ => {
            streak.count = 1;
            StreakChange::Started
        }
    };
    streak.last_date = Some(today);
    change
}

/// Check if the streak is still alive on `today` (credited today or yesterday)
pub fn is_active(streak: &Streak, today: NaiveDate) -> bool {
    let Some(last) = streak.last_date else {
        return false;
    };
    (today - last).num_days() <= 1
}

/// Format a calendar day as YYYY-MM-DD
pub fn day_string(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Parse a calendar day, accepting both `2026-10-18` and the verbose
/// `Sun Oct 18 2026` form older saves used
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%a %b %d %Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_first_completion_starts_streak() {
        let mut streak = Streak::default();
        assert_eq!(advance(&mut streak, day(18)), StreakChange::Started);
        assert_eq!(streak.count, 1);
        assert_eq!(streak.last_date, Some(day(18)));
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut streak = Streak {
            count: 2,
            last_date: Some(day(17)),
        };
        assert_eq!(advance(&mut streak, day(18)), StreakChange::Extended);
        assert_eq!(streak.count, 3);
    }

    #[test]
    fn test_same_day_counts_once() {
        let mut streak = Streak {
            count: 4,
            last_date: Some(day(18)),
        };
        assert_eq!(advance(&mut streak, day(18)), StreakChange::AlreadyCounted);
        assert_eq!(streak.count, 4);
    }

    #[test]
    fn test_gap_resets() {
        let mut streak = Streak {
            count: 9,
            last_date: Some(day(10)),
        };
        assert_eq!(advance(&mut streak, day(18)), StreakChange::Started);
        assert_eq!(streak.count, 1);
        assert!(is_active(&streak, day(19)));
        assert!(!is_active(&streak, day(20)));
    }

    #[test]
    fn test_parse_day_formats() {
        assert_eq!(parse_day("2026-10-18"), Some(day(18)));
        assert_eq!(parse_day("Sun Oct 18 2026"), Some(day(18)));
        assert_eq!(parse_day(""), None);
        assert_eq!(day_string(day(3)), "2026-10-03");
    }
}
