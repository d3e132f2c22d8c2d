//! Achievements: catalog, checks and one-way unlocking

mod checker;
mod definitions;

pub use checker::{
    Trigger, check_daily_xp_achievements, check_level_achievements, check_quest_achievements,
    check_stat_achievements, check_streak_achievements, evaluate,
};
pub use definitions::{ACHIEVEMENTS, AchievementDef, AchievementId};

use crate::domain::{Achievement, AppState};

/// Fresh, all-locked achievement slots
pub fn seed() -> Vec<Achievement> {
    ACHIEVEMENTS.iter().map(AchievementDef::locked).collect()
}

/// Stamp `unlocked_at` on an achievement that is still locked.
///
/// Returns false (and changes nothing) if it was already unlocked. A catalog entry
/// missing from the state is re-added before unlocking.
pub fn unlock(state: &mut AppState, id: AchievementId, now_ms: i64) -> bool {
    match state.achievements.iter_mut().find(|a| a.id == id.as_str()) {
        Some(slot) if slot.unlocked_at.is_some() => false,
        Some(slot) => {
            slot.unlocked_at = Some(now_ms);
            true
        }
        None => {
            let mut slot = AchievementDef::get(id).locked();
            slot.unlocked_at = Some(now_ms);
            state.achievements.push(slot);
            true
        }
    }
}

/// Add any catalog entries missing from `achievements`, keeping existing slots as they are
pub fn complete_catalog(achievements: &mut Vec<Achievement>) {
    for def in ACHIEVEMENTS {
        if !achievements.iter().any(|a| a.id == def.id.as_str()) {
            achievements.push(def.locked());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_is_one_way() {
        let mut state = AppState::default();
        assert!(unlock(&mut state, AchievementId::Level5, 100));
        assert!(!unlock(&mut state, AchievementId::Level5, 200));
        assert_eq!(state.achievement("level_5").unwrap().unlocked_at, Some(100));
    }

    #[test]
    fn test_complete_catalog_keeps_existing() {
        let mut slots = vec![Achievement {
            id: "streak_3".to_string(),
            name: "3-Day Streak".to_string(),
            unlocked_at: Some(42),
            icon: "🔥".to_string(),
        }];
        complete_catalog(&mut slots);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0].unlocked_at, Some(42));
    }
}
