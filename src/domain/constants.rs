//! Tunable progression constants
//!
//! All reward, cost and threshold numbers live here so the reducer reads as rules,
//! not magic numbers.

/// Base of the level curve: level L needs `floor(LEVEL_XP_BASE * L^1.5)` XP
pub const LEVEL_XP_BASE: f64 = 100.0;

/// XP and stat rewards for completing things
pub struct Rewards;

impl Rewards {
    /// XP for ticking off a single subtask
    pub const SUBTASK_XP: u32 = 15;

    /// Stat points for ticking off a single subtask
    pub const SUBTASK_STAT: u32 = 1;

    /// Flat XP for completing a daily (never scaled by focus)
    pub const DAILY_XP: u32 = 30;

    /// Stat points for completing a daily
    pub const DAILY_STAT: u32 = 2;

    /// Mana regenerated by completing a daily
    pub const DAILY_MP_REGEN: u32 = 5;
}

/// Costs and penalties
pub struct Penalties;

impl Penalties {
    /// Health lost per daily missed on the previous day
    pub const MISSED_DAILY_HP: u32 = 10;
}

/// Power focus: a one-shot XP/stat multiplier bought with mana
pub struct Focus;

impl Focus {
    pub const MP_COST: u32 = 20;
    pub const MULTIPLIER: f64 = 2.0;
}

/// Completions needed while fainted before the character recovers
pub const RECOVERY_TASKS_NEEDED: u32 = 3;

/// Flat bonus on top of half of max health when recovering
pub const RECOVERY_HP_BONUS: u32 = 20;

/// Number of days shown in a daily's streak window
pub const STREAK_WINDOW: usize = 7;

/// Fresh-character defaults
pub struct Defaults;

impl Defaults {
    pub const CHARACTER_NAME: &'static str = "Hero";
    pub const HP_MAX: u32 = 100;
    pub const MP_MAX: u32 = 80;
    pub const STAT: u32 = 10;
}
