//! Time and identity sources for the reducer
//!
//! The progression core never reads the wall clock itself: each action is applied
//! against a single `Moment` taken once from a `Clock`.

use chrono::{Local, NaiveDate, Utc};

/// The instant an action is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    /// Local calendar day
    pub today: NaiveDate,
    /// Unix timestamp in milliseconds
    pub now_ms: i64,
}

impl Moment {
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self { today, now_ms }
    }
}

pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn now_ms(&self) -> i64;

    fn moment(&self) -> Moment {
        Moment::new(self.today(), self.now_ms())
    }
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a given day, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_ms: i64,
}

impl FixedClock {
    pub fn on(today: NaiveDate) -> Self {
        let now_ms = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self { today, now_ms }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_ms(&self) -> i64 {
        self.now_ms
    }
}
