//! Achievement checking logic
//!
//! Each check returns the ids whose condition holds and that are not yet unlocked.

use super::definitions::AchievementId;
use crate::domain::{AppState, Stats};
use crate::progression::levels::level_for;

/// Which completion path triggered the evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Subtask tick or quest completion
    Quest,
    /// Daily completion
    Daily,
}

fn is_unlocked(state: &AppState, id: AchievementId) -> bool {
    state
        .achievement(id.as_str())
        .is_some_and(|a| a.is_unlocked())
}

/// First quest lands in the archive
pub fn check_quest_achievements(completed_quests: usize) -> Vec<AchievementId> {
    if completed_quests == 1 {
        vec![AchievementId::FirstQuest]
    } else {
        Vec::new()
    }
}

/// Level milestones
pub fn check_level_achievements(total_xp: u64) -> Vec<AchievementId> {
    if level_for(total_xp) >= 5 {
        vec![AchievementId::Level5]
    } else {
        Vec::new()
    }
}

/// XP earned since the start of the calendar day
pub fn check_daily_xp_achievements(earned_today: u64) -> Vec<AchievementId> {
    if earned_today >= 100 {
        vec![AchievementId::Xp100Day]
    } else {
        Vec::new()
    }
}

/// Streak milestones
pub fn check_streak_achievements(streak_days: u32) -> Vec<AchievementId> {
    if streak_days >= 3 {
        vec![AchievementId::Streak3]
    } else {
        Vec::new()
    }
}

/// Balanced build
pub fn check_stat_achievements(stats: &Stats) -> Vec<AchievementId> {
    if stats.all_at_least(50) {
        vec![AchievementId::AllStats50]
    } else {
        Vec::new()
    }
}

/// Collect every achievement the state now qualifies for and has not unlocked yet.
///
/// The streak check only runs on the daily path.
pub fn evaluate(state: &AppState, trigger: Trigger) -> Vec<AchievementId> {
    let mut candidates = Vec::new();

    candidates.extend(check_quest_achievements(state.completed_quests.len()));
    if trigger == Trigger::Daily {
        candidates.extend(check_streak_achievements(state.streak.count));
    }
    candidates.extend(check_level_achievements(state.total_xp));
    candidates.extend(check_daily_xp_achievements(
        state.day_ledger.earned_today(state.total_xp),
    ));
    candidates.extend(check_stat_achievements(&state.stats));

    candidates.retain(|id| !is_unlocked(state, *id));
    candidates
}
