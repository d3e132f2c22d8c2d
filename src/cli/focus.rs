//! Power focus commands

use anyhow::Result;

use questlog::domain::constants::Focus;
use questlog::progression::{Action, ProgressionEvent};

use super::Session;

pub async fn focus_on_command(session: &Session) -> Result<()> {
    let transition = session.run(Action::ActivateFocus).await?;
    if !transition.events.contains(&ProgressionEvent::FocusActivated) {
        let state = &transition.state;
        if state.power_focus_active {
            println!("Power focus is already armed.");
        } else {
            println!(
                "Not enough mana: {} MP needed, {} available.",
                Focus::MP_COST,
                state.mp
            );
        }
    }
    Ok(())
}

pub async fn focus_off_command(session: &Session) -> Result<()> {
    let transition = session.run(Action::CancelFocus).await?;
    if !transition.events.contains(&ProgressionEvent::FocusCancelled) {
        println!("Power focus was not armed.");
    }
    Ok(())
}
