use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::constants::Defaults;
use super::{CharacterConfig, Daily, Quest, Stats};
use crate::progression::achievements;

/// Consecutive calendar days with at least one completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub count: u32,
    #[serde(default)]
    pub last_date: Option<NaiveDate>,
}

/// An achievement slot as stored in the state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unlocked_at: Option<i64>,
    #[serde(default)]
    pub icon: String,
}

impl Achievement {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// XP total at the start of the current calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayLedger {
    pub date: Option<NaiveDate>,
    pub xp_at_start: u64,
}

impl DayLedger {
    /// XP earned since the ledger was opened
    pub fn earned_today(&self, total_xp: u64) -> u64 {
        total_xp.saturating_sub(self.xp_at_start)
    }
}

/// The whole persisted application state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub character_name: String,
    pub total_xp: u64,
    /// Cached from `total_xp`; recomputed after every XP change
    pub level: u32,
    pub hp: u32,
    pub hp_max: u32,
    pub mp: u32,
    pub mp_max: u32,
    pub streak: Streak,
    pub stats: Stats,
    pub quests: Vec<Quest>,
    pub completed_quests: Vec<Quest>,
    pub dailies: Vec<Daily>,
    pub achievements: Vec<Achievement>,
    pub power_focus_active: bool,
    pub fainted: bool,
    pub recovery_tasks_done: u32,
    pub character_config: Option<CharacterConfig>,
    #[serde(default)]
    pub day_ledger: DayLedger,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            character_name: Defaults::CHARACTER_NAME.to_string(),
            total_xp: 0,
            level: 1,
            hp: Defaults::HP_MAX,
            hp_max: Defaults::HP_MAX,
            mp: Defaults::MP_MAX,
            mp_max: Defaults::MP_MAX,
            streak: Streak::default(),
            stats: Stats::uniform(Defaults::STAT),
            quests: Vec::new(),
            completed_quests: Vec::new(),
            dailies: Vec::new(),
            achievements: achievements::seed(),
            power_focus_active: false,
            fainted: false,
            recovery_tasks_done: 0,
            character_config: None,
            day_ledger: DayLedger::default(),
        }
    }
}

impl AppState {
    pub fn active_quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn archived_quest(&self, quest_id: &str) -> Option<&Quest> {
        self.completed_quests.iter().find(|q| q.id == quest_id)
    }

    pub fn daily(&self, daily_id: &str) -> Option<&Daily> {
        self.dailies.iter().find(|d| d.id == daily_id)
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_unlocked()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_seeds_catalog() {
        let state = AppState::default();
        assert_eq!(state.achievements.len(), 5);
        assert_eq!(state.unlocked_count(), 0);
        assert_eq!(state.level, 1);
        assert_eq!((state.hp, state.hp_max), (100, 100));
        assert_eq!((state.mp, state.mp_max), (80, 80));
        assert!(state.stats.iter().all(|(_, v)| v == 10));
    }

    #[test]
    fn test_state_uses_camel_case_keys() {
        let value = serde_json::to_value(AppState::default()).unwrap();
        assert!(value.get("totalXp").is_some());
        assert!(value.get("powerFocusActive").is_some());
        assert!(value.get("recoveryTasksDone").is_some());
        assert_eq!(value["streak"]["lastDate"], serde_json::Value::Null);
    }
}
