//! Schema migration for persisted and imported state
//!
//! Older saves come in several shapes. Rather than patching fields inline, every
//! known legacy shape is one `MigrationStep` over the raw JSON. Steps run in order,
//! each only when its predicate matches. After migration the JSON is merged onto a
//! default `AppState` field by field, so one corrupt field never discards the rest.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::constants::{RECOVERY_TASKS_NEEDED, STREAK_WINDOW};
use crate::domain::{AppState, Difficulty, Stat, Stats};
use crate::progression::achievements::complete_catalog;
use crate::progression::levels::level_for;
use crate::progression::streaks::{day_string, parse_day};

/// One legacy-shape fix
pub struct MigrationStep {
    pub name: &'static str,
    pub applies: fn(&Value) -> bool,
    pub apply: fn(&mut Value, NaiveDate),
}

/// All steps, in the order they run
pub static STEPS: &[MigrationStep] = &[
    MigrationStep {
        name: "legacy-stat-keys",
        applies: has_legacy_stat_keys,
        apply: remap_stat_keys,
    },
    MigrationStep {
        name: "legacy-skill-ids",
        applies: has_legacy_skills,
        apply: remap_skills,
    },
    MigrationStep {
        name: "verbose-date-strings",
        applies: has_verbose_dates,
        apply: normalize_dates,
    },
    MigrationStep {
        name: "empty-streak-date",
        applies: has_empty_streak_date,
        apply: clear_empty_streak_date,
    },
    MigrationStep {
        name: "missing-rollover-guard",
        applies: has_missing_rollover_guard,
        apply: default_rollover_guard,
    },
    MigrationStep {
        name: "streak-dot-window",
        applies: has_bad_streak_window,
        apply: fix_streak_window,
    },
];

/// Run every applicable step. Returns the names of the steps that ran.
pub fn migrate(value: &mut Value, today: NaiveDate) -> Vec<&'static str> {
    let mut applied = Vec::new();
    for step in STEPS {
        if (step.applies)(value) {
            (step.apply)(value, today);
            debug!("Applied migration step: {}", step.name);
            applied.push(step.name);
        }
    }
    applied
}

const ENTITY_LISTS: [&str; 3] = ["quests", "completedQuests", "dailies"];

fn entities(value: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    ENTITY_LISTS
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
}

fn entities_mut(value: &mut Value) -> Vec<&mut Map<String, Value>> {
    let Some(root) = value.as_object_mut() else {
        return Vec::new();
    };
    root.iter_mut()
        .filter(|(key, _)| ENTITY_LISTS.contains(&key.as_str()))
        .filter_map(|(_, list)| list.as_array_mut())
        .flatten()
        .filter_map(Value::as_object_mut)
        .collect()
}

fn dailies_mut(value: &mut Value) -> impl Iterator<Item = &mut Map<String, Value>> {
    value
        .get_mut("dailies")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn has_legacy_stat_keys(value: &Value) -> bool {
    value
        .get("stats")
        .and_then(Value::as_object)
        .is_some_and(|stats| stats.keys().any(|k| Stat::legacy_key(k).is_some()))
}

fn remap_stat_keys(value: &mut Value, _today: NaiveDate) {
    let Some(stats) = value.get_mut("stats").and_then(Value::as_object_mut) else {
        return;
    };
    let legacy: Vec<String> = stats
        .keys()
        .filter(|k| Stat::legacy_key(k).is_some())
        .cloned()
        .collect();
    for key in legacy {
        if let (Some(full), Some(v)) = (Stat::legacy_key(&key), stats.remove(&key)) {
            stats.insert(full.to_string(), v);
        }
    }
}

fn skill_needs_remap(entity: &Map<String, Value>) -> bool {
    match entity.get("skill") {
        Some(Value::String(s)) => !Stat::ALL.iter().any(|stat| stat.as_str() == s),
        _ => true,
    }
}

fn has_legacy_skills(value: &Value) -> bool {
    entities(value).any(skill_needs_remap)
}

fn remap_skills(value: &mut Value, _today: NaiveDate) {
    for entity in entities_mut(value) {
        if !skill_needs_remap(entity) {
            continue;
        }
        let full = entity
            .get("skill")
            .and_then(Value::as_str)
            .and_then(|s| Stat::legacy_key(s).or_else(|| Stat::from_str(s).map(|st| st.as_str())))
            .unwrap_or(Stat::Strength.as_str());
        entity.insert("skill".to_string(), Value::String(full.to_string()));
    }
}

fn is_verbose_date(v: Option<&Value>) -> bool {
    match v.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() && parse_day(s).is_some()
        }
        _ => false,
    }
}

fn streak_date(value: &Value) -> Option<&Value> {
    value.get("streak").and_then(|s| s.get("lastDate"))
}

fn has_verbose_dates(value: &Value) -> bool {
    is_verbose_date(streak_date(value))
        || value
            .get("dailies")
            .and_then(Value::as_array)
            .is_some_and(|ds| ds.iter().any(|d| is_verbose_date(d.get("lastRolledDate"))))
}

fn rewrite_day(slot: &mut Value) {
    if let Some(day) = slot.as_str().and_then(parse_day) {
        *slot = Value::String(day_string(day));
    }
}

fn normalize_dates(value: &mut Value, _today: NaiveDate) {
    if let Some(slot) = value
        .get_mut("streak")
        .and_then(|s| s.get_mut("lastDate"))
    {
        rewrite_day(slot);
    }
    for daily in dailies_mut(value) {
        if let Some(slot) = daily.get_mut("lastRolledDate") {
            rewrite_day(slot);
        }
    }
}

fn has_empty_streak_date(value: &Value) -> bool {
    streak_date(value)
        .and_then(Value::as_str)
        .is_some_and(|s| s.trim().is_empty())
}

fn clear_empty_streak_date(value: &mut Value, _today: NaiveDate) {
    if let Some(streak) = value.get_mut("streak").and_then(Value::as_object_mut) {
        streak.insert("lastDate".to_string(), Value::Null);
    }
}

fn rollover_guard_missing(daily: &Map<String, Value>) -> bool {
    daily
        .get("lastRolledDate")
        .and_then(Value::as_str)
        .and_then(parse_day)
        .is_none()
}

fn has_missing_rollover_guard(value: &Value) -> bool {
    value
        .get("dailies")
        .and_then(Value::as_array)
        .is_some_and(|ds| {
            ds.iter()
                .filter_map(Value::as_object)
                .any(rollover_guard_missing)
        })
}

/// Dailies without a usable guard count as rolled today, so loading an old save
/// never charges retroactive penalties
fn default_rollover_guard(value: &mut Value, today: NaiveDate) {
    for daily in dailies_mut(value) {
        if rollover_guard_missing(daily) {
            daily.insert("lastRolledDate".to_string(), Value::String(day_string(today)));
        }
    }
}

fn window_is_valid(daily: &Map<String, Value>) -> bool {
    daily
        .get("streakDots")
        .and_then(Value::as_array)
        .is_some_and(|dots| dots.len() == STREAK_WINDOW && dots.iter().all(Value::is_boolean))
}

fn has_bad_streak_window(value: &Value) -> bool {
    value
        .get("dailies")
        .and_then(Value::as_array)
        .is_some_and(|ds| ds.iter().filter_map(Value::as_object).any(|d| !window_is_valid(d)))
}

fn fix_streak_window(value: &mut Value, _today: NaiveDate) {
    for daily in dailies_mut(value) {
        if window_is_valid(daily) {
            continue;
        }
        let old: Vec<bool> = daily
            .get("streakDots")
            .and_then(Value::as_array)
            .map(|dots| dots.iter().map(|d| d.as_bool().unwrap_or(false)).collect())
            .unwrap_or_default();
        let dots: Vec<Value> = (0..STREAK_WINDOW)
            .map(|i| Value::Bool(old.get(i).copied().unwrap_or(false)))
            .collect();
        daily.insert("streakDots".to_string(), Value::Array(dots));
    }
}

/// Deserialize a single field, logging and skipping it when malformed
pub(crate) fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key).filter(|v| !v.is_null())?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring malformed field '{}': {}", key, e);
            None
        }
    }
}

/// A non-negative integer field; fractional numbers are rounded
pub(crate) fn number(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    let n = obj.get(key)?.as_f64()?;
    n.is_finite().then(|| n.max(0.0).round() as u64)
}

pub(crate) fn small_number(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    number(obj, key).map(|n| n.min(u64::from(u32::MAX)) as u32)
}

/// Deserialize a list element by element, dropping malformed entries
pub(crate) fn list<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<Vec<T>> {
    let items = obj.get(key)?.as_array()?;
    let parsed = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Dropping malformed {} entry #{}: {}", key, i, e);
                None
            }
        })
        .collect();
    Some(parsed)
}

/// Deserialize a list of quests or dailies. Each entry is repaired field by field
/// first, so only an entry without a usable id is dropped.
pub(crate) fn entity_list<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<Vec<T>> {
    let items = obj.get(key)?.as_array()?;
    let parsed = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let Some(mut entry) = item.as_object().cloned().filter(|e| usable_id(e)) else {
                warn!("Dropping {} entry #{} without an id", key, i);
                return None;
            };
            repair_entity(&mut entry);
            match serde_json::from_value(Value::Object(entry)) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Dropping malformed {} entry #{}: {}", key, i, e);
                    None
                }
            }
        })
        .collect();
    Some(parsed)
}

/// A non-empty string id; numeric ids from older saves count too
fn usable_id(entry: &Map<String, Value>) -> bool {
    match entry.get("id") {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

fn stringify_id(entry: &mut Map<String, Value>) {
    if let Some(Value::Number(n)) = entry.get("id") {
        let id = n.to_string();
        entry.insert("id".to_string(), Value::String(id));
    }
}

/// Replace `key` with `fallback` when present but not accepted by `valid`
fn reset_field(
    entry: &mut Map<String, Value>,
    key: &str,
    valid: fn(&Value) -> bool,
    fallback: Value,
) {
    if entry.get(key).is_some_and(|v| !valid(v)) {
        warn!("Resetting malformed field '{}' to its default", key);
        entry.insert(key.to_string(), fallback);
    }
}

fn is_difficulty(v: &Value) -> bool {
    v.as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Difficulty::new)
        .is_some()
}

fn is_timestamp(v: &Value) -> bool {
    v.is_i64()
}

fn is_optional_timestamp(v: &Value) -> bool {
    v.is_null() || v.is_i64()
}

fn is_reward(v: &Value) -> bool {
    v.as_u64().is_some_and(|n| u32::try_from(n).is_ok())
}

/// Field-level fallbacks shared by quests, archived quests and dailies
fn repair_entity(entry: &mut Map<String, Value>) {
    stringify_id(entry);
    if !entry.get("title").is_some_and(Value::is_string) {
        let id = entry.get("id").cloned().unwrap_or(Value::Null);
        entry.insert("title".to_string(), id);
    }
    reset_field(entry, "plainDescription", Value::is_string, Value::String(String::new()));
    if skill_needs_remap(entry) {
        warn!("Resetting malformed field 'skill' to its default");
        entry.insert("skill".to_string(), Value::String(Stat::default().as_str().to_string()));
    }
    reset_field(entry, "difficulty", is_difficulty, Value::from(Difficulty::default().value()));
    reset_field(entry, "completedAt", is_optional_timestamp, Value::Null);
    reset_field(entry, "createdAt", is_timestamp, Value::from(0));
    reset_field(entry, "xpReward", is_reward, Value::from(0));
    reset_field(entry, "statReward", is_reward, Value::from(0));
    reset_field(entry, "completedToday", Value::is_boolean, Value::Bool(false));
    reset_field(entry, "subTasks", Value::is_array, Value::Array(Vec::new()));

    if let Some(tasks) = entry.get_mut("subTasks").and_then(Value::as_array_mut) {
        tasks.retain(|task| task.as_object().is_some_and(usable_id));
        for task in tasks.iter_mut().filter_map(Value::as_object_mut) {
            stringify_id(task);
            if !task.get("label").is_some_and(Value::is_string) {
                task.insert("label".to_string(), Value::String(String::new()));
            }
            reset_field(task, "done", Value::is_boolean, Value::Bool(false));
        }
    }
}

/// Stats merged key by key onto `base`
pub(crate) fn stats_onto(obj: &Map<String, Value>, base: Stats) -> Option<Stats> {
    let raw = obj.get("stats")?.as_object()?;
    let mut stats = base;
    for stat in Stat::ALL {
        if let Some(v) = small_number(raw, stat.as_str()) {
            stats.set(stat, v);
        }
    }
    Some(stats)
}

/// Build an `AppState` from migrated JSON, falling back to defaults field by field
pub fn merge_onto_defaults(value: &Value) -> AppState {
    let mut state = AppState::default();
    let Some(obj) = value.as_object() else {
        warn!("Stored state is not a JSON object, using defaults");
        return state;
    };

    if let Some(v) = field::<String>(obj, "characterName") {
        state.character_name = v;
    }
    if let Some(v) = number(obj, "totalXp") {
        state.total_xp = v;
    }
    if let Some(v) = small_number(obj, "hpMax") {
        state.hp_max = v;
    }
    if let Some(v) = small_number(obj, "hp") {
        state.hp = v;
    }
    if let Some(v) = small_number(obj, "mpMax") {
        state.mp_max = v;
    }
    if let Some(v) = small_number(obj, "mp") {
        state.mp = v;
    }
    if let Some(v) = field(obj, "streak") {
        state.streak = v;
    }
    if let Some(v) = stats_onto(obj, state.stats) {
        state.stats = v;
    }
    if let Some(v) = entity_list(obj, "quests") {
        state.quests = v;
    }
    if let Some(v) = entity_list(obj, "completedQuests") {
        state.completed_quests = v;
    }
    if let Some(v) = entity_list(obj, "dailies") {
        state.dailies = v;
    }
    if let Some(v) = list(obj, "achievements") {
        state.achievements = v;
    }
    if let Some(v) = field(obj, "powerFocusActive") {
        state.power_focus_active = v;
    }
    if let Some(v) = field(obj, "fainted") {
        state.fainted = v;
    }
    if let Some(v) = small_number(obj, "recoveryTasksDone") {
        state.recovery_tasks_done = v;
    }
    if let Some(v) = field(obj, "characterConfig") {
        state.character_config = Some(v);
    }
    if let Some(v) = field(obj, "dayLedger") {
        state.day_ledger = v;
    }

    normalize(&mut state);
    state
}

/// Re-establish state invariants after loading or importing
pub fn normalize(state: &mut AppState) {
    state.level = level_for(state.total_xp);
    state.hp_max = state.hp_max.max(1);
    state.mp_max = state.mp_max.max(1);
    state.hp = state.hp.min(state.hp_max);
    state.mp = state.mp.min(state.mp_max);
    if state.hp == 0 {
        state.fainted = true;
    }
    if state.fainted {
        state.recovery_tasks_done = state.recovery_tasks_done.min(RECOVERY_TASKS_NEEDED - 1);
    } else {
        state.recovery_tasks_done = 0;
    }

    // A quest lives in exactly one list; the archive wins
    let archived: Vec<String> = state
        .completed_quests
        .iter()
        .map(|q| q.id.clone())
        .collect();
    state.quests.retain(|q| !archived.contains(&q.id));

    complete_catalog(&mut state.achievements);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_legacy_stat_keys_are_remapped() {
        let mut value = json!({ "stats": { "STR": 40, "INT": 22, "WISDOM": 5 } });
        let applied = migrate(&mut value, today());
        assert!(applied.contains(&"legacy-stat-keys"));
        let state = merge_onto_defaults(&value);
        assert_eq!(state.stats.strength, 40);
        assert_eq!(state.stats.intellect, 22);
        assert_eq!(state.stats.agility, 10);
        assert_eq!(state.stats.wisdom, 5);
    }

    #[test]
    fn test_legacy_skills_and_missing_guard() {
        let mut value = json!({
            "dailies": [{ "id": "d1", "title": "Read", "skill": "INT" }],
            "quests": [{ "id": "q1", "title": "Ship", "skill": "AGI" }]
        });
        migrate(&mut value, today());
        let state = merge_onto_defaults(&value);
        assert_eq!(state.dailies[0].skill, Stat::Intellect);
        assert_eq!(state.dailies[0].last_rolled_date, today());
        assert_eq!(state.dailies[0].streak_dots, [false; 7]);
        assert_eq!(state.quests[0].skill, Stat::Agility);
    }

    #[test]
    fn test_verbose_dates_are_normalized() {
        let mut value = json!({
            "streak": { "count": 2, "lastDate": "Sat Oct 17 2026" },
            "dailies": [{
                "id": "d1", "title": "Read", "skill": "WISDOM",
                "streakDots": [true, false, false, false, false, false, false],
                "lastRolledDate": "Sat Oct 17 2026"
            }]
        });
        migrate(&mut value, today());
        let state = merge_onto_defaults(&value);
        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(state.streak.last_date, Some(yesterday));
        assert_eq!(state.dailies[0].last_rolled_date, yesterday);
    }

    #[test]
    fn test_empty_streak_date_becomes_none() {
        let mut value = json!({ "streak": { "count": 0, "lastDate": "" } });
        migrate(&mut value, today());
        let state = merge_onto_defaults(&value);
        assert_eq!(state.streak.last_date, None);
    }

    #[test]
    fn test_short_streak_window_is_padded() {
        let mut value = json!({
            "dailies": [{
                "id": "d1", "title": "Run", "skill": "AGILITY",
                "streakDots": [true, true],
                "lastRolledDate": "2026-10-18"
            }]
        });
        migrate(&mut value, today());
        let state = merge_onto_defaults(&value);
        assert_eq!(
            state.dailies[0].streak_dots,
            [true, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_corrupt_field_keeps_the_rest() {
        let value = json!({
            "characterName": 42,
            "totalXp": 500,
            "quests": [
                { "id": "ok", "title": "Fine", "skill": "STRENGTH", "difficulty": 2 },
                { "id": "bad", "difficulty": 99 },
                { "title": "No id" }
            ]
        });
        let state = merge_onto_defaults(&value);
        assert_eq!(state.character_name, "Hero");
        assert_eq!(state.total_xp, 500);
        assert_eq!(state.level, 3);
        assert_eq!(state.quests.len(), 2);
        assert_eq!(state.quests[0].id, "ok");
        assert_eq!(state.quests[0].difficulty.value(), 2);
        assert_eq!(state.quests[1].id, "bad");
        assert_eq!(state.quests[1].title, "bad");
        assert_eq!(state.quests[1].difficulty, Difficulty::default());
    }

    #[test]
    fn test_malformed_entity_fields_fall_back_to_defaults() {
        let mut value = json!({
            "quests": [{
                "id": "q1", "title": "Ship", "skill": "LUCK", "difficulty": "hard",
                "createdAt": "yesterday",
                "subTasks": [
                    { "id": "s1", "label": "Draft", "done": true },
                    { "id": "s2", "label": 7, "done": "yes" },
                    { "label": "orphan" },
                    { "id": 3 }
                ]
            }],
            "dailies": [{
                "id": "d1", "title": "Read", "skill": "wisdom",
                "completedToday": "yes",
                "streakDots": [true, false, false, false, false, false, false],
                "lastRolledDate": "2026-10-18"
            }]
        });
        migrate(&mut value, today());
        let state = merge_onto_defaults(&value);

        assert_eq!(state.quests.len(), 1);
        let quest = &state.quests[0];
        assert_eq!(quest.skill, Stat::Strength);
        assert_eq!(quest.difficulty, Difficulty::default());
        assert_eq!(quest.created_at, 0);
        assert_eq!(quest.sub_tasks.len(), 3);
        assert!(quest.sub_tasks[0].done);
        assert_eq!(quest.sub_tasks[1].label, "");
        assert!(!quest.sub_tasks[1].done);
        assert_eq!(quest.sub_tasks[2].id, "3");

        assert_eq!(state.dailies.len(), 1);
        assert_eq!(state.dailies[0].skill, Stat::Wisdom);
        assert!(!state.dailies[0].completed_today);
        assert!(state.dailies[0].streak_dots[0]);
    }

    #[test]
    fn test_normalize_enforces_invariants() {
        let value = json!({
            "hp": 0,
            "hpMax": 100,
            "fainted": false,
            "recoveryTasksDone": 7,
            "quests": [{ "id": "q", "title": "Dup", "skill": "STRENGTH" }],
            "completedQuests": [{ "id": "q", "title": "Dup", "skill": "STRENGTH" }],
            "achievements": []
        });
        let state = merge_onto_defaults(&value);
        assert!(state.fainted);
        assert_eq!(state.recovery_tasks_done, RECOVERY_TASKS_NEEDED - 1);
        assert!(state.quests.is_empty());
        assert_eq!(state.completed_quests.len(), 1);
        assert_eq!(state.achievements.len(), 5);
    }

    #[test]
    fn test_zero_max_pools_are_raised() {
        let value = json!({ "hp": 0, "hpMax": 0, "mp": 0, "mpMax": 0 });
        let state = merge_onto_defaults(&value);
        assert_eq!(state.hp_max, 1);
        assert_eq!(state.mp_max, 1);
        assert_eq!(state.hp, 0);
        assert!(state.fainted);
    }

    #[test]
    fn test_clean_state_needs_no_steps() {
        let mut value = serde_json::to_value(AppState::default()).unwrap();
        assert!(migrate(&mut value, today()).is_empty());
        assert_eq!(merge_onto_defaults(&value), AppState::default());
    }
}
