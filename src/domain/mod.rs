//! Core domain types for Questlog

mod character;
mod clock;
pub mod constants;
mod daily;
mod ids;
mod quest;
mod stat;
mod state;

pub use character::{CharacterConfig, Gender, SkinTone};
pub use clock::{Clock, FixedClock, Moment, SystemClock};
pub use daily::{Daily, StreakDots};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use quest::{Difficulty, Quest, SubTask};
pub use stat::{STAT_MAX, Stat, Stats};
pub use state::{Achievement, AppState, DayLedger, Streak};
