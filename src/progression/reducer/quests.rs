//! Quest actions: create, tick subtasks, complete, clear

use super::{Draft, ProgressionEvent, Transition, scaled};
use crate::domain::constants::Rewards;
use crate::domain::{AppState, Difficulty, IdGenerator, Moment, Quest, Stat, SubTask};
use crate::progression::achievements::Trigger;

/// Input for a new quest
#[derive(Debug, Clone)]
pub struct NewQuest {
    pub title: String,
    pub plain_description: String,
    pub skill: Stat,
    pub difficulty: Difficulty,
    pub sub_task_labels: Vec<String>,
}

/// Append a new active quest; rewards are fixed here from the difficulty table
pub fn create_quest(
    state: &AppState,
    new: NewQuest,
    moment: Moment,
    ids: &mut dyn IdGenerator,
) -> Transition {
    let mut draft = Draft::begin(state, moment);

    let sub_tasks = new
        .sub_task_labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .map(|label| SubTask {
            id: ids.next_id(),
            label,
            done: false,
        })
        .collect();

    let title = if new.title.trim().is_empty() {
        new.plain_description.trim().to_string()
    } else {
        new.title.trim().to_string()
    };

    let quest = Quest {
        id: ids.next_id(),
        title,
        plain_description: new.plain_description.trim().to_string(),
        skill: new.skill,
        difficulty: new.difficulty,
        sub_tasks,
        completed_at: None,
        created_at: moment.now_ms,
        xp_reward: new.difficulty.xp_reward(),
        stat_reward: new.difficulty.stat_reward(),
    };

    draft.events.push(ProgressionEvent::QuestCreated {
        quest_id: quest.id.clone(),
    });
    draft.state.quests.push(quest);
    draft.finish()
}

/// Flip a subtask of an active quest.
///
/// Ticking a subtask awards its XP/stat, credits the streak and counts towards
/// recovery. Ticking the last one also archives the quest and awards the quest's
/// own rewards. An active focus buff is consumed either way. Unknown ids (including
/// archived quests) leave the state as rolled.
pub fn toggle_subtask(
    state: &AppState,
    quest_id: &str,
    sub_task_id: &str,
    moment: Moment,
) -> Transition {
    let mut draft = Draft::begin(state, moment);

    let Some(qi) = draft.state.quests.iter().position(|q| q.id == quest_id) else {
        return draft.finish();
    };
    let Some(si) = draft.state.quests[qi]
        .sub_tasks
        .iter()
        .position(|t| t.id == sub_task_id)
    else {
        return draft.finish();
    };

    let multiplier = draft.consume_focus();

    let quest = &mut draft.state.quests[qi];
    let was_done = quest.sub_tasks[si].done;
    quest.sub_tasks[si].done = !was_done;
    let skill = quest.skill;
    let all_done = quest.all_done();

    if was_done {
        return draft.finish();
    }

    draft.award_xp(scaled(Rewards::SUBTASK_XP, multiplier), "subtask");
    draft.raise_stat(skill, scaled(Rewards::SUBTASK_STAT, multiplier));
    draft.credit_streak();
    draft.advance_recovery();

    if all_done {
        let mut quest = draft.state.quests.remove(qi);
        quest.completed_at = Some(moment.now_ms);
        let (xp, stat) = (quest.xp_reward, quest.stat_reward);
        draft.events.push(ProgressionEvent::QuestCompleted {
            quest_id: quest.id.clone(),
            title: quest.title.clone(),
        });
        draft.state.completed_quests.push(quest);

        draft.award_xp(scaled(xp, multiplier), "quest");
        draft.raise_stat(skill, scaled(stat, multiplier));
        draft.credit_streak();
    }

    draft.evaluate_achievements(Trigger::Quest);
    draft.finish()
}

/// Drop every active and archived quest
pub fn clear_quests(state: &AppState, moment: Moment) -> Transition {
    let mut draft = Draft::begin(state, moment);
    draft.state.quests.clear();
    draft.state.completed_quests.clear();
    draft.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIds;
    use crate::progression::reducer::activate_focus;
    use chrono::NaiveDate;

    fn moment() -> Moment {
        Moment::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), 1_000)
    }

    fn new_quest(difficulty: u8, labels: &[&str]) -> NewQuest {
        NewQuest {
            title: "Siege Upon Backend".to_string(),
            plain_description: "ship the api".to_string(),
            skill: Stat::Strength,
            difficulty: Difficulty::new(difficulty).unwrap(),
            sub_task_labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn with_quest(difficulty: u8, labels: &[&str]) -> AppState {
        let mut ids = SequentialIds::new("id");
        create_quest(
            &AppState::default(),
            new_quest(difficulty, labels),
            moment(),
            &mut ids,
        )
        .state
    }

    #[test]
    fn test_create_quest_fixes_rewards() {
        let state = with_quest(4, &["a", " ", "b"]);
        let quest = &state.quests[0];
        assert_eq!(quest.xp_reward, 500);
        assert_eq!(quest.stat_reward, 15);
        assert_eq!(quest.sub_tasks.len(), 2);
        assert!(quest.sub_tasks.iter().all(|t| !t.done));
        assert_eq!(quest.created_at, 1_000);
        assert_eq!(state.total_xp, 0);
    }

    #[test]
    fn test_blank_title_falls_back_to_description() {
        let mut new = new_quest(1, &[]);
        new.title = "  ".to_string();
        let t = create_quest(&AppState::default(), new, moment(), &mut SequentialIds::new("q"));
        assert_eq!(t.state.quests[0].title, "ship the api");
    }

    #[test]
    fn test_partial_progress_awards_subtask_only() {
        let state = with_quest(2, &["a", "b"]);
        let t = toggle_subtask(&state, "id-3", "id-1", moment());
        assert_eq!(t.state.total_xp, 15);
        assert_eq!(t.state.stats.strength, 11);
        assert_eq!(t.state.quests.len(), 1);
        assert_eq!(t.state.streak.count, 1);
    }

    #[test]
    fn test_untick_does_not_refund() {
        let state = with_quest(2, &["a", "b"]);
        let on = toggle_subtask(&state, "id-3", "id-1", moment()).state;
        let off = toggle_subtask(&on, "id-3", "id-1", moment()).state;
        assert_eq!(off.total_xp, 15);
        assert!(!off.quests[0].sub_tasks[0].done);
    }

    #[test]
    fn test_focus_consumed_on_untick() {
        let state = with_quest(2, &["a", "b"]);
        let on = toggle_subtask(&state, "id-3", "id-1", moment()).state;
        let focused = activate_focus(&on, moment()).state;
        let t = toggle_subtask(&focused, "id-3", "id-1", moment());
        assert!(!t.state.power_focus_active);
        assert_eq!(t.state.total_xp, 15);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let state = with_quest(2, &["a"]);
        let t = toggle_subtask(&state, "nope", "id-1", moment());
        assert_eq!(t.state, state);
        let t = toggle_subtask(&state, "id-2", "nope", moment());
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_archived_quest_cannot_be_toggled() {
        let state = with_quest(1, &["a"]);
        let done = toggle_subtask(&state, "id-2", "id-1", moment()).state;
        assert_eq!(done.completed_quests.len(), 1);
        let again = toggle_subtask(&done, "id-2", "id-1", moment()).state;
        assert_eq!(again, done);
    }

    #[test]
    fn test_clear_quests() {
        let state = with_quest(1, &["a", "b"]);
        let t = clear_quests(&state, moment());
        assert!(t.state.quests.is_empty());
        assert!(t.state.completed_quests.is_empty());
    }
}
