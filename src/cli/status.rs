//! Status command implementation

use anyhow::Result;

use questlog::domain::{AppState, Clock, Daily};
use questlog::progression::achievements::{AchievementDef, AchievementId};
use questlog::progression::{Action, LevelProgress, flavor, streaks};

use super::Session;

fn bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Seven-day window, oldest first
pub fn dots(daily: &Daily) -> String {
    daily
        .streak_dots
        .iter()
        .rev()
        .map(|done| if *done { 'o' } else { '.' })
        .collect()
}

/// Roll the day over, then print the character sheet
pub async fn status_command(session: &Session, json: bool) -> Result<()> {
    let transition = session.run(Action::Tick).await?;
    let state = &transition.state;

    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    print_sheet(state, session.clock.today());
    Ok(())
}

fn print_sheet(state: &AppState, today: chrono::NaiveDate) {
    let progress = LevelProgress::for_xp(state.total_xp);
    let dominant = flavor::dominant_stat(&state.stats);
    let title = state
        .character_config
        .as_ref()
        .map(|c| c.class_title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| flavor::class_title(&state.stats));

    println!("{}, {}", state.character_name, title);
    println!("  {}", flavor::class_flavor(dominant));
    println!(
        "  Level {} {} {}/{} XP (total {})",
        progress.level,
        bar(progress.fraction(), 20),
        progress.current_in_level,
        progress.needed_for_next,
        state.total_xp
    );
    println!("  HP {}/{}  MP {}/{}", state.hp, state.hp_max, state.mp, state.mp_max);

    let streak_state = if streaks::is_active(&state.streak, today) {
        ""
    } else {
        " (inactive)"
    };
    println!("  Streak: {} day(s){}", state.streak.count, streak_state);
    println!("  Equipment tier: {}", flavor::equipment_tier(state.level));

    if state.fainted {
        println!(
            "  FAINTED: recovery {}/{}",
            state.recovery_tasks_done,
            questlog::domain::constants::RECOVERY_TASKS_NEEDED
        );
    }
    if state.power_focus_active {
        println!("  Power focus armed");
    }

    println!();
    for (stat, value) in state.stats.iter() {
        println!("  {:<10} {:>3} {}", stat.as_str(), value, bar(value as f32 / 100.0, 20));
    }

    println!();
    println!(
        "  Quests: {} active, {} completed",
        state.quests.len(),
        state.completed_quests.len()
    );
    for daily in &state.dailies {
        let mark = if daily.completed_today { "x" } else { " " };
        println!("  [{}] {} {}", mark, dots(daily), daily.title);
    }

    println!();
    println!(
        "  Achievements ({}/{}):",
        state.unlocked_count(),
        state.achievements.len()
    );
    for achievement in &state.achievements {
        let mark = if achievement.is_unlocked() { "x" } else { " " };
        let description = AchievementId::from_str(&achievement.id)
            .map(|id| AchievementDef::get(id).description)
            .unwrap_or("");
        println!(
            "  [{}] {} {}: {}",
            mark, achievement.icon, achievement.name, description
        );
    }
}
