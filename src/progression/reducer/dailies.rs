//! Daily actions: add and toggle

use super::{Draft, ProgressionEvent, Transition};
use crate::domain::constants::{Rewards, STREAK_WINDOW};
use crate::domain::{AppState, Daily, IdGenerator, Moment, Stat};
use crate::progression::achievements::Trigger;

/// Input for a new daily
#[derive(Debug, Clone)]
pub struct NewDaily {
    pub title: String,
    pub plain_description: String,
    pub skill: Stat,
}

/// Append a daily that counts as already rolled today, so it cannot be penalized
/// on its creation day
pub fn add_daily(
    state: &AppState,
    new: NewDaily,
    moment: Moment,
    ids: &mut dyn IdGenerator,
) -> Transition {
    let mut draft = Draft::begin(state, moment);

    let title = if new.title.trim().is_empty() {
        new.plain_description.trim().to_string()
    } else {
        new.title.trim().to_string()
    };

    let daily = Daily {
        id: ids.next_id(),
        title,
        plain_description: new.plain_description.trim().to_string(),
        skill: new.skill,
        streak_dots: [false; STREAK_WINDOW],
        completed_today: false,
        created_at: moment.now_ms,
        last_rolled_date: moment.today,
    };

    draft.events.push(ProgressionEvent::DailyAdded {
        daily_id: daily.id.clone(),
    });
    draft.state.dailies.push(daily);
    draft.finish()
}

/// Flip today's completion of a daily.
///
/// Checking it awards flat XP (never focus-scaled), stat and mana, credits the
/// streak and counts towards recovery. Unchecking only clears the flag: rewards
/// already granted today are kept.
pub fn toggle_daily(state: &AppState, daily_id: &str, moment: Moment) -> Transition {
    let mut draft = Draft::begin(state, moment);

    let Some(di) = draft.state.dailies.iter().position(|d| d.id == daily_id) else {
        return draft.finish();
    };
    let daily = &mut draft.state.dailies[di];
    let done = !daily.completed_today;
    daily.completed_today = done;
    daily.streak_dots[0] = done;
    let skill = daily.skill;

    if done {
        draft.award_xp(Rewards::DAILY_XP, "daily");
        draft.raise_stat(skill, Rewards::DAILY_STAT);
        draft.restore_mana(Rewards::DAILY_MP_REGEN);
        draft.credit_streak();
        draft.advance_recovery();
        draft.evaluate_achievements(Trigger::Daily);
    }

    draft.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SequentialIds, Streak};
    use chrono::NaiveDate;

    fn moment(d: u32) -> Moment {
        Moment::new(NaiveDate::from_ymd_opt(2026, 10, d).unwrap(), i64::from(d))
    }

    fn with_daily(d: u32) -> AppState {
        add_daily(
            &AppState::default(),
            NewDaily {
                title: "Scholar Morning Rite".to_string(),
                plain_description: "read".to_string(),
                skill: Stat::Intellect,
            },
            moment(d),
            &mut SequentialIds::new("d"),
        )
        .state
    }

    #[test]
    fn test_new_daily_is_rolled_today() {
        let state = with_daily(18);
        let daily = &state.dailies[0];
        assert_eq!(daily.last_rolled_date, moment(18).today);
        assert_eq!(daily.streak_dots, [false; 7]);
        assert_eq!(state.hp, 100);
    }

    #[test]
    fn test_untoggle_keeps_rewards() {
        let state = with_daily(18);
        let on = toggle_daily(&state, "d-1", moment(18)).state;
        let off = toggle_daily(&on, "d-1", moment(18)).state;
        assert_eq!(off.total_xp, 30);
        assert_eq!(off.stats.intellect, 12);
        assert!(!off.dailies[0].completed_today);
        assert!(!off.dailies[0].streak_dots[0]);
    }

    #[test]
    fn test_mana_capped_at_max() {
        let state = with_daily(18);
        assert_eq!(state.mp, state.mp_max);
        let on = toggle_daily(&state, "d-1", moment(18)).state;
        assert_eq!(on.mp, on.mp_max);
    }

    #[test]
    fn test_focus_not_used_by_dailies() {
        let mut state = with_daily(18);
        state.power_focus_active = true;
        let on = toggle_daily(&state, "d-1", moment(18)).state;
        assert_eq!(on.total_xp, 30);
        assert!(on.power_focus_active);
    }

    #[test]
    fn test_three_day_streak_unlocks() {
        let mut state = with_daily(18);
        state.streak = Streak {
            count: 2,
            last_date: Some(moment(17).today),
        };
        let t = toggle_daily(&state, "d-1", moment(18));
        assert_eq!(t.state.streak.count, 3);
        assert!(t.state.achievement("streak_3").unwrap().is_unlocked());
    }

    #[test]
    fn test_unknown_daily_is_noop() {
        let state = with_daily(18);
        let t = toggle_daily(&state, "missing", moment(18));
        assert_eq!(t.state, state);
        assert!(t.events.is_empty());
    }
}
