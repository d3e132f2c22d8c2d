//! Progression core: level curve, daily rollover, streaks, achievements and the
//! action reducer that ties them together
//!
//! Everything in here is deterministic. Time comes in as a `Moment` and ids from an
//! `IdGenerator`; nothing touches storage or the network.

pub mod achievements;
pub mod flavor;
pub mod levels;
pub mod reducer;
pub mod rollover;
pub mod streaks;

pub use levels::{LevelProgress, level_for, xp_for_level};
pub use reducer::{Action, NewDaily, NewQuest, ProgressionEvent, Transition, apply};
pub use rollover::{RolloverReport, roll_dailies};
