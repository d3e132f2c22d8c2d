//! Progression reducer
//!
//! Every user action is a pure function from the current `AppState` to a new one.
//! Each handler first refreshes the day ledger and rolls dailies forward to the
//! action's `Moment`, then applies its effect, then evaluates achievements.
//!
//! # Usage
//!
//! ```ignore
//! let moment = SystemClock.moment();
//! let transition = reducer::apply(&state, Action::ToggleDaily { daily_id }, moment, &mut UuidIds);
//! store.save(&transition.state);
//! ```

mod dailies;
mod focus;
mod quests;

pub use dailies::{NewDaily, add_daily, toggle_daily};
pub use focus::{activate_focus, cancel_focus};
pub use quests::{NewQuest, clear_quests, create_quest, toggle_subtask};

use tracing::info;

use super::achievements::{self, AchievementDef, AchievementId, Trigger};
use super::levels::level_for;
use super::rollover;
use super::streaks::{self, StreakChange};
use crate::domain::constants::{Focus, RECOVERY_HP_BONUS, RECOVERY_TASKS_NEEDED};
use crate::domain::{AppState, CharacterConfig, IdGenerator, Moment, Stat};

/// Something noteworthy that happened while applying an action
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    XpAwarded { amount: u64, reason: String },
    StatRaised { stat: Stat, amount: u32 },
    LevelUp { old_level: u32, new_level: u32 },
    AchievementUnlocked { id: AchievementId, name: &'static str },
    StreakExtended { count: u32 },
    ManaRestored { amount: u32 },
    HealthLost { amount: u32, missed_dailies: usize },
    Fainted,
    RecoveryProgress { done: u32, needed: u32 },
    Recovered { hp: u32 },
    QuestCreated { quest_id: String },
    QuestCompleted { quest_id: String, title: String },
    DailyAdded { daily_id: String },
    FocusActivated,
    FocusConsumed,
    FocusCancelled,
    /// Character identity or appearance changed; remote mirrors may want to upsert
    ProfileChanged,
}

/// Result of applying one action
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: AppState,
    pub events: Vec<ProgressionEvent>,
}

impl Transition {
    /// True when the profile mirror should be notified
    pub fn profile_changed(&self) -> bool {
        self.events.contains(&ProgressionEvent::ProfileChanged)
    }
}

/// All user actions the reducer understands
#[derive(Debug, Clone)]
pub enum Action {
    CreateQuest(NewQuest),
    ToggleSubtask { quest_id: String, sub_task_id: String },
    AddDaily(NewDaily),
    ToggleDaily { daily_id: String },
    ActivateFocus,
    CancelFocus,
    RenameCharacter(String),
    ConfigureCharacter(CharacterConfig),
    ClearQuests,
    /// Timer tick: only the day rollover runs
    Tick,
}

/// Apply a single action
pub fn apply(
    state: &AppState,
    action: Action,
    moment: Moment,
    ids: &mut dyn IdGenerator,
) -> Transition {
    match action {
        Action::CreateQuest(new) => create_quest(state, new, moment, ids),
        Action::ToggleSubtask {
            quest_id,
            sub_task_id,
        } => toggle_subtask(state, &quest_id, &sub_task_id, moment),
        Action::AddDaily(new) => add_daily(state, new, moment, ids),
        Action::ToggleDaily { daily_id } => toggle_daily(state, &daily_id, moment),
        Action::ActivateFocus => activate_focus(state, moment),
        Action::CancelFocus => cancel_focus(state, moment),
        Action::RenameCharacter(name) => rename_character(state, &name, moment),
        Action::ConfigureCharacter(config) => configure_character(state, config, moment),
        Action::ClearQuests => clear_quests(state, moment),
        Action::Tick => tick(state, moment),
    }
}

/// Roll the day over without any other effect
pub fn tick(state: &AppState, moment: Moment) -> Transition {
    Draft::begin(state, moment).finish()
}

/// Change the display name; blank names are ignored
pub fn rename_character(state: &AppState, name: &str, moment: Moment) -> Transition {
    let mut draft = Draft::begin(state, moment);
    let name = name.trim();
    if !name.is_empty() && name != draft.state.character_name {
        draft.state.character_name = name.to_string();
        if let Some(config) = draft.state.character_config.as_mut() {
            config.character_name = name.to_string();
        }
        draft.events.push(ProgressionEvent::ProfileChanged);
    }
    draft.finish()
}

/// Store the onboarding appearance and adopt its name
pub fn configure_character(
    state: &AppState,
    config: CharacterConfig,
    moment: Moment,
) -> Transition {
    let mut draft = Draft::begin(state, moment);
    let name = config.character_name.trim();
    if !name.is_empty() {
        draft.state.character_name = name.to_string();
    }
    draft.state.character_config = Some(config);
    draft.events.push(ProgressionEvent::ProfileChanged);
    draft.finish()
}

/// Scale a reward by the focus multiplier, rounding to the nearest integer
pub(crate) fn scaled(base: u32, multiplier: f64) -> u32 {
    (f64::from(base) * multiplier).round() as u32
}

/// Working copy of the state while one action is applied
pub(crate) struct Draft {
    pub state: AppState,
    pub events: Vec<ProgressionEvent>,
    pub moment: Moment,
}

impl Draft {
    /// Clone the state, open today's XP ledger and roll dailies to today
    pub fn begin(state: &AppState, moment: Moment) -> Self {
        let mut state = state.clone();
        let mut events = Vec::new();

        if state.day_ledger.date != Some(moment.today) {
            state.day_ledger.date = Some(moment.today);
            state.day_ledger.xp_at_start = state.total_xp;
        }
        state.level = level_for(state.total_xp);

        let report = rollover::roll_in_place(&mut state, moment.today);
        if report.hp_lost > 0 {
            events.push(ProgressionEvent::HealthLost {
                amount: report.hp_lost,
                missed_dailies: report.missed,
            });
        }
        if report.fainted {
            info!("Character fainted after missing {} dailies", report.missed);
            events.push(ProgressionEvent::Fainted);
        }

        Self {
            state,
            events,
            moment,
        }
    }

    pub fn finish(self) -> Transition {
        Transition {
            state: self.state,
            events: self.events,
        }
    }

    /// Take the focus buff if active. Returns the multiplier for this completion.
    pub fn consume_focus(&mut self) -> f64 {
        if self.state.power_focus_active {
            self.state.power_focus_active = false;
            self.events.push(ProgressionEvent::FocusConsumed);
            Focus::MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn award_xp(&mut self, amount: u32, reason: &str) {
        if amount == 0 {
            return;
        }
        let old_level = self.state.level;
        self.state.total_xp += u64::from(amount);
        self.state.level = level_for(self.state.total_xp);
        self.events.push(ProgressionEvent::XpAwarded {
            amount: u64::from(amount),
            reason: reason.to_string(),
        });
        if self.state.level > old_level {
            info!("Level up: {} -> {}", old_level, self.state.level);
            self.events.push(ProgressionEvent::LevelUp {
                old_level,
                new_level: self.state.level,
            });
        }
    }

    pub fn raise_stat(&mut self, stat: Stat, amount: u32) {
        let gained = self.state.stats.raise(stat, amount);
        if gained > 0 {
            self.events.push(ProgressionEvent::StatRaised {
                stat,
                amount: gained,
            });
        }
    }

    pub fn restore_mana(&mut self, amount: u32) {
        let before = self.state.mp;
        self.state.mp = before.saturating_add(amount).min(self.state.mp_max);
        if self.state.mp > before {
            self.events.push(ProgressionEvent::ManaRestored {
                amount: self.state.mp - before,
            });
        }
    }

    pub fn credit_streak(&mut self) {
        let change = streaks::advance(&mut self.state.streak, self.moment.today);
        if change != StreakChange::AlreadyCounted {
            self.events.push(ProgressionEvent::StreakExtended {
                count: self.state.streak.count,
            });
        }
    }

    /// Count a qualifying completion towards getting back up
    pub fn advance_recovery(&mut self) {
        if !self.state.fainted {
            return;
        }
        let done = self.state.recovery_tasks_done + 1;
        if done >= RECOVERY_TASKS_NEEDED {
            let hp_max = self.state.hp_max;
            self.state.fainted = false;
            self.state.recovery_tasks_done = 0;
            self.state.hp = hp_max.min(hp_max / 2 + RECOVERY_HP_BONUS);
            info!("Character recovered with {} HP", self.state.hp);
            self.events.push(ProgressionEvent::Recovered { hp: self.state.hp });
        } else {
            self.state.recovery_tasks_done = done;
            self.events.push(ProgressionEvent::RecoveryProgress {
                done,
                needed: RECOVERY_TASKS_NEEDED,
            });
        }
    }

    pub fn evaluate_achievements(&mut self, trigger: Trigger) {
        for id in achievements::evaluate(&self.state, trigger) {
            if achievements::unlock(&mut self.state, id, self.moment.now_ms) {
                info!("Achievement unlocked: {}", id);
                self.events.push(ProgressionEvent::AchievementUnlocked {
                    id,
                    name: AchievementDef::get(id).name,
                });
            }
        }
    }
}
