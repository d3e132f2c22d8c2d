use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Stat;
use super::constants::STREAK_WINDOW;

/// Rolling completion window: index 0 is today, index 6 is six days ago
pub type StreakDots = [bool; STREAK_WINDOW];

/// A recurring habit tracked per calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Daily {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub plain_description: String,
    #[serde(default)]
    pub skill: Stat,
    #[serde(default)]
    pub streak_dots: StreakDots,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default)]
    pub created_at: i64,
    /// Last calendar day the rollover engine processed this daily
    pub last_rolled_date: NaiveDate,
}

impl Daily {
    /// Days marked done within the window
    pub fn dots_done(&self) -> usize {
        self.streak_dots.iter().filter(|d| **d).count()
    }

    /// Shift the window one day: drop the oldest slot and open an empty one for today
    pub(crate) fn shift_window(&mut self) {
        self.streak_dots.rotate_right(1);
        self.streak_dots[0] = false;
    }
}
