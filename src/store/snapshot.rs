//! Human-readable export/import of the gameplay part of the state

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::StoreError;
use super::migrate::{self, entity_list, field, list, number, small_number, stats_onto};
use crate::domain::{
    Achievement, AppState, CharacterConfig, Daily, Quest, Stats, Streak,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportSnapshot<'a> {
    character_name: &'a str,
    character_config: &'a Option<CharacterConfig>,
    total_xp: u64,
    level: u32,
    hp: u32,
    hp_max: u32,
    mp: u32,
    mp_max: u32,
    streak: &'a Streak,
    stats: &'a Stats,
    quests: &'a [Quest],
    completed_quests: &'a [Quest],
    dailies: &'a [Daily],
    achievements: &'a [Achievement],
    export_date: String,
}

/// Pretty-printed JSON snapshot, stamped with an ISO-8601 `exportDate`
pub fn export_state(state: &AppState, exported_at: DateTime<Utc>) -> Result<String, StoreError> {
    let snapshot = ExportSnapshot {
        character_name: &state.character_name,
        character_config: &state.character_config,
        total_xp: state.total_xp,
        level: state.level,
        hp: state.hp,
        hp_max: state.hp_max,
        mp: state.mp,
        mp_max: state.mp_max,
        streak: &state.streak,
        stats: &state.stats,
        quests: &state.quests,
        completed_quests: &state.completed_quests,
        dailies: &state.dailies,
        achievements: &state.achievements,
        export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Fields recovered from an imported snapshot; absent or malformed ones stay `None`
#[derive(Debug, Clone, Default)]
pub struct ImportPatch {
    pub character_name: Option<String>,
    pub character_config: Option<CharacterConfig>,
    pub total_xp: Option<u64>,
    pub hp: Option<u32>,
    pub hp_max: Option<u32>,
    pub mp: Option<u32>,
    pub mp_max: Option<u32>,
    pub streak: Option<Streak>,
    pub stats: Option<Stats>,
    pub quests: Option<Vec<Quest>>,
    pub completed_quests: Option<Vec<Quest>>,
    pub dailies: Option<Vec<Daily>>,
    pub achievements: Option<Vec<Achievement>>,
}

impl ImportPatch {
    pub fn is_empty(&self) -> bool {
        self.character_name.is_none()
            && self.character_config.is_none()
            && self.total_xp.is_none()
            && self.hp.is_none()
            && self.hp_max.is_none()
            && self.mp.is_none()
            && self.mp_max.is_none()
            && self.streak.is_none()
            && self.stats.is_none()
            && self.quests.is_none()
            && self.completed_quests.is_none()
            && self.dailies.is_none()
            && self.achievements.is_none()
    }

    /// Overlay the patch on `state`.
    ///
    /// Achievements already unlocked locally stay unlocked even if the snapshot
    /// has them locked.
    pub fn apply_to(self, state: &AppState) -> AppState {
        let mut next = state.clone();
        if let Some(v) = self.character_name {
            next.character_name = v;
        }
        if let Some(v) = self.character_config {
            next.character_config = Some(v);
        }
        if let Some(v) = self.total_xp {
            // Keep today's earnings, never count imported XP as earned today
            let earned = state.day_ledger.earned_today(state.total_xp);
            next.total_xp = v;
            next.day_ledger.xp_at_start = v.saturating_sub(earned);
        }
        if let Some(v) = self.hp_max {
            next.hp_max = v;
        }
        if let Some(v) = self.hp {
            next.hp = v;
        }
        if let Some(v) = self.mp_max {
            next.mp_max = v;
        }
        if let Some(v) = self.mp {
            next.mp = v;
        }
        if let Some(v) = self.streak {
            next.streak = v;
        }
        if let Some(v) = self.stats {
            next.stats = v;
        }
        if let Some(v) = self.quests {
            next.quests = v;
        }
        if let Some(v) = self.completed_quests {
            next.completed_quests = v;
        }
        if let Some(v) = self.dailies {
            next.dailies = v;
        }
        if let Some(mut imported) = self.achievements {
            for local in state.achievements.iter().filter(|a| a.is_unlocked()) {
                match imported.iter_mut().find(|a| a.id == local.id) {
                    Some(slot) => slot.unlocked_at = local.unlocked_at,
                    None => imported.push(local.clone()),
                }
            }
            next.achievements = imported;
        }
        migrate::normalize(&mut next);
        next
    }
}

/// Parse a snapshot (current or legacy shape) into a patch.
///
/// Unknown fields are ignored. Only unparseable JSON or a non-object root is an error.
pub fn import_state(json: &str, today: NaiveDate) -> Result<ImportPatch, StoreError> {
    let mut value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(StoreError::InvalidSnapshot(
            "expected a JSON object at the top level".to_string(),
        ));
    }
    let applied = migrate::migrate(&mut value, today);
    if !applied.is_empty() {
        debug!("Import migrated with steps: {:?}", applied);
    }

    let Some(obj) = value.as_object() else {
        return Ok(ImportPatch::default());
    };

    // A streak only counts if it carries a numeric count
    let streak = obj
        .get("streak")
        .filter(|s| s.get("count").is_some_and(Value::is_number))
        .and_then(|_| field::<Streak>(obj, "streak"));

    Ok(ImportPatch {
        character_name: field(obj, "characterName"),
        character_config: field(obj, "characterConfig"),
        total_xp: number(obj, "totalXp"),
        hp: small_number(obj, "hp"),
        hp_max: small_number(obj, "hpMax"),
        mp: small_number(obj, "mp"),
        mp_max: small_number(obj, "mpMax"),
        streak,
        stats: stats_onto(obj, Stats::default()),
        quests: entity_list(obj, "quests"),
        completed_quests: entity_list(obj, "completedQuests"),
        dailies: entity_list(obj, "dailies"),
        achievements: list(obj, "achievements"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayLedger;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_export_contains_gameplay_fields_only() {
        let mut state = AppState::default();
        state.power_focus_active = true;
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let json = export_state(&state, at).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exportDate"], "2026-10-18T09:30:00.000Z");
        assert_eq!(value["characterName"], "Hero");
        assert!(value.get("powerFocusActive").is_none());
        assert!(value.get("fainted").is_none());
        assert!(value.get("dayLedger").is_none());
        assert!(json.contains("\n  \"totalXp\""));
    }

    #[test]
    fn test_export_then_import_restores_progress() {
        let mut state = AppState::default();
        state.total_xp = 1234;
        state.stats.wisdom = 77;
        state.character_name = "Orion".to_string();
        let json = export_state(&state, Utc::now()).unwrap();

        let patch = import_state(&json, today()).unwrap();
        let restored = patch.apply_to(&AppState::default());
        assert_eq!(restored.total_xp, 1234);
        assert_eq!(restored.level, 4);
        assert_eq!(restored.stats.wisdom, 77);
        assert_eq!(restored.character_name, "Orion");
    }

    #[test]
    fn test_import_legacy_stat_shape() {
        let json = r#"{ "stats": { "STR": 30, "AGI": 45 }, "mystery": true }"#;
        let patch = import_state(json, today()).unwrap();
        let stats = patch.stats.unwrap();
        assert_eq!(stats.strength, 30);
        assert_eq!(stats.agility, 45);
        assert_eq!(stats.intellect, 10);
        assert!(patch.total_xp.is_none());
    }

    #[test]
    fn test_import_rejects_non_object() {
        assert!(matches!(
            import_state("[1, 2]", today()),
            Err(StoreError::InvalidSnapshot(_))
        ));
        assert!(matches!(import_state("{oops", today()), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_import_keeps_local_unlocks() {
        let mut local = AppState::default();
        local.achievements[0].unlocked_at = Some(99);
        let json = export_state(&AppState::default(), Utc::now()).unwrap();

        let merged = import_state(&json, today()).unwrap().apply_to(&local);
        assert_eq!(merged.achievements[0].unlocked_at, Some(99));
    }

    #[test]
    fn test_import_never_rewrites_local_unlock_time() {
        let mut local = AppState::default();
        local.achievements[0].unlocked_at = Some(111);
        let mut snapshot = AppState::default();
        snapshot.achievements[0].unlocked_at = Some(999);
        let json = export_state(&snapshot, Utc::now()).unwrap();

        let merged = import_state(&json, today()).unwrap().apply_to(&local);
        assert_eq!(merged.achievements[0].unlocked_at, Some(111));
    }

    #[test]
    fn test_imported_xp_is_not_earned_today() {
        let mut local = AppState::default();
        local.total_xp = 200;
        local.day_ledger = DayLedger {
            date: Some(today()),
            xp_at_start: 160,
        };
        let mut snapshot = AppState::default();
        snapshot.total_xp = 5000;
        let json = export_state(&snapshot, Utc::now()).unwrap();

        let merged = import_state(&json, today()).unwrap().apply_to(&local);
        assert_eq!(merged.total_xp, 5000);
        assert_eq!(merged.day_ledger.date, Some(today()));
        assert_eq!(merged.day_ledger.earned_today(merged.total_xp), 40);
    }

    #[test]
    fn test_imported_entities_survive_bad_fields() {
        let json = r#"{
            "quests": [{ "id": "q1", "title": "Ship", "skill": "LUCK", "difficulty": 0 }],
            "dailies": [{ "id": "d1", "title": "Read", "completedToday": "yes" }]
        }"#;
        let patch = import_state(json, today()).unwrap();
        let quests = patch.quests.unwrap();
        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].skill, crate::domain::Stat::Strength);
        let dailies = patch.dailies.unwrap();
        assert_eq!(dailies.len(), 1);
        assert!(!dailies[0].completed_today);
        assert_eq!(dailies[0].last_rolled_date, today());
    }

    #[test]
    fn test_streak_without_count_is_ignored() {
        let json = r#"{ "streak": { "lastDate": "2026-10-17" } }"#;
        let patch = import_state(json, today()).unwrap();
        assert!(patch.streak.is_none());
        assert!(patch.is_empty());
    }
}
