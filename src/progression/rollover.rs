//! Daily rollover engine
//!
//! Advances every daily's streak window to `today`, at most once per calendar day,
//! and charges health for dailies left undone yesterday.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::AppState;
use crate::domain::constants::Penalties;

/// What a rollover pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverReport {
    /// Dailies whose window was shifted
    pub rolled: usize,
    /// Dailies that were due yesterday and not completed
    pub missed: usize,
    /// Health actually removed (after flooring at 0)
    pub hp_lost: u32,
    /// True when this pass knocked the character out
    pub fainted: bool,
}

/// Roll all dailies forward to `today`, returning the new state
pub fn roll_dailies(state: &AppState, today: NaiveDate) -> AppState {
    let mut next = state.clone();
    roll_in_place(&mut next, today);
    next
}

/// Roll all dailies forward to `today` in place.
///
/// Dailies already rolled today are untouched, so a second call on the same day is a no-op.
pub fn roll_in_place(state: &mut AppState, today: NaiveDate) -> RolloverReport {
    let yesterday = today.pred_opt();
    let mut report = RolloverReport::default();

    for daily in state.dailies.iter_mut() {
        if daily.last_rolled_date == today {
            continue;
        }
        let done_yesterday = daily.streak_dots[0];
        if Some(daily.last_rolled_date) == yesterday && !done_yesterday {
            report.missed += 1;
        }
        daily.shift_window();
        daily.completed_today = false;
        daily.last_rolled_date = today;
        report.rolled += 1;
    }

    if report.missed > 0 {
        let penalty = Penalties::MISSED_DAILY_HP.saturating_mul(report.missed as u32);
        let before = state.hp;
        state.hp = state.hp.saturating_sub(penalty);
        report.hp_lost = before - state.hp;
        if state.hp == 0 && !state.fainted {
            state.fainted = true;
            state.recovery_tasks_done = 0;
            report.fainted = true;
        }
    }

    if report.rolled > 0 {
        debug!(
            "Rolled {} dailies to {} ({} missed, -{} HP)",
            report.rolled, today, report.missed, report.hp_lost
        );
    }

    report
}
