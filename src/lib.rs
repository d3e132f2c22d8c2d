//! Questlog - a role-playing progress tracker for real work
//!
//! Quests (one-off tasks with subtasks) and dailies (recurring habits) earn XP and
//! raise four character stats. A level curve, a day rollover that punishes missed
//! dailies, a faint/recovery loop, a mana-funded focus buff and one-way achievements
//! sit on top.
//!
//! ## Layers
//!
//! 1. **domain**: plain data (`AppState`, `Quest`, `Daily`, `Stats`) plus the clock
//!    and id seams.
//! 2. **progression**: pure functions from a state and an action to the next state
//!    and the events it produced.
//! 3. **store**: JSON persistence behind a key-value trait, with migration of older
//!    saves and export/import snapshots.
//! 4. **remote**: optional decorative network services (name generation, public
//!    profile, leaderboard, friends). Nothing there can change `AppState`.

pub mod config;
pub mod domain;
pub mod progression;
pub mod remote;
pub mod store;

pub use domain::*;
pub use progression::{Action, ProgressionEvent, Transition, apply};
pub use store::{FileStore, KvStore, MemoryStore, StateStore, StoreError};
