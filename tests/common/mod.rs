//! Shared test utilities for progression and store tests

#![allow(dead_code)]

use chrono::{Days, NaiveDate};

use questlog::domain::{AppState, Difficulty, Moment, SequentialIds, Stat};
use questlog::progression::{Action, NewDaily, NewQuest, Transition, apply};

/// Day `n` of a fixed test calendar (day 0 is 2026-10-01)
pub fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1)
        .expect("valid date")
        .checked_add_days(Days::new(n))
        .expect("date in range")
}

/// Moment on day `n`; timestamps grow with the day so unlock times are ordered
pub fn moment(n: u64) -> Moment {
    Moment::new(day(n), 1_790_000_000_000 + (n as i64) * 86_400_000)
}

/// Applies actions with deterministic ids
pub struct Driver {
    pub ids: SequentialIds,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            ids: SequentialIds::new("t"),
        }
    }

    pub fn apply(&mut self, state: &AppState, action: Action, on_day: u64) -> Transition {
        apply(state, action, moment(on_day), &mut self.ids)
    }

    /// Create a quest and return the new state plus the quest id
    pub fn quest(
        &mut self,
        state: &AppState,
        skill: Stat,
        difficulty: u8,
        labels: &[&str],
        on_day: u64,
    ) -> (AppState, String) {
        let new = NewQuest {
            title: String::new(),
            plain_description: format!("quest {}", labels.join(" ")),
            skill,
            difficulty: Difficulty::new(difficulty).expect("difficulty in range"),
            sub_task_labels: labels.iter().map(|l| l.to_string()).collect(),
        };
        let next = self.apply(state, Action::CreateQuest(new), on_day).state;
        let id = next.quests.last().expect("quest created").id.clone();
        (next, id)
    }

    /// Create a daily and return the new state plus the daily id
    pub fn daily(&mut self, state: &AppState, habit: &str, skill: Stat, on_day: u64) -> (AppState, String) {
        let new = NewDaily {
            title: String::new(),
            plain_description: habit.to_string(),
            skill,
        };
        let next = self.apply(state, Action::AddDaily(new), on_day).state;
        let id = next.dailies.last().expect("daily created").id.clone();
        (next, id)
    }

    /// Tick subtask `index` of quest `quest_id`
    pub fn tick(&mut self, state: &AppState, quest_id: &str, index: usize, on_day: u64) -> Transition {
        let quest = state.active_quest(quest_id).expect("active quest");
        let sub_task_id = quest.sub_tasks[index].id.clone();
        self.apply(
            state,
            Action::ToggleSubtask {
                quest_id: quest_id.to_string(),
                sub_task_id,
            },
            on_day,
        )
    }
}

/// Small deterministic generator for action sequences
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> u64 {
        if n == 0 { 0 } else { self.next() % n }
    }
}
