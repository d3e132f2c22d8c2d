//! Power focus: spend mana now to double the next completion's rewards

use super::{Draft, ProgressionEvent, Transition};
use crate::domain::constants::Focus;
use crate::domain::{AppState, Moment};

/// Buy the focus buff. No-op when already active or short on mana.
pub fn activate_focus(state: &AppState, moment: Moment) -> Transition {
    let mut draft = Draft::begin(state, moment);
    if !draft.state.power_focus_active && draft.state.mp >= Focus::MP_COST {
        draft.state.mp -= Focus::MP_COST;
        draft.state.power_focus_active = true;
        draft.events.push(ProgressionEvent::FocusActivated);
    }
    draft.finish()
}

/// Drop the focus buff. Mana is not refunded.
pub fn cancel_focus(state: &AppState, moment: Moment) -> Transition {
    let mut draft = Draft::begin(state, moment);
    if draft.state.power_focus_active {
        draft.state.power_focus_active = false;
        draft.events.push(ProgressionEvent::FocusCancelled);
    }
    draft.finish()
}
