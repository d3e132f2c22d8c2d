//! Quest commands

use anyhow::{Result, bail};

use questlog::domain::{AppState, Difficulty, Quest, Stat};
use questlog::progression::{Action, NewQuest};
use questlog::remote::{NameRequest, generate_or_fallback};

use super::{Session, resolve_id, short_id};

pub async fn quest_add_command(
    session: &Session,
    description: String,
    skill: Stat,
    difficulty: Difficulty,
    subtasks: Vec<String>,
    title: Option<String>,
) -> Result<()> {
    if description.trim().is_empty() {
        bail!("Quest description cannot be empty");
    }

    let title = match title {
        Some(t) => t,
        None => match session.name_generator() {
            Some(generator) => {
                let request = NameRequest::Quest {
                    task: description.trim().to_string(),
                    skill,
                };
                generate_or_fallback(generator, request, session.name_timeout()).await
            }
            None => String::new(),
        },
    };

    let transition = session
        .run(Action::CreateQuest(NewQuest {
            title,
            plain_description: description,
            skill,
            difficulty,
            sub_task_labels: subtasks,
        }))
        .await?;

    if let Some(quest) = transition.state.quests.last() {
        print_quest(quest);
    }
    Ok(())
}

/// Subtasks can be named by id, id prefix or 1-based position
fn resolve_sub_task(quest: &Quest, needle: &str) -> Result<String> {
    if let Ok(position) = needle.trim().parse::<usize>() {
        if let Some(sub) = position.checked_sub(1).and_then(|i| quest.sub_tasks.get(i)) {
            return Ok(sub.id.clone());
        }
    }
    resolve_id(
        "subtask",
        quest.sub_tasks.iter().map(|s| s.id.as_str()),
        needle,
    )
}

/// Find the active quest a toggle targets; archived quests get a clearer error
fn resolve_active_quest<'a>(state: &'a AppState, needle: &str) -> Result<&'a Quest> {
    let active = resolve_id("quest", state.quests.iter().map(|q| q.id.as_str()), needle);
    if let Some(quest) = active.as_deref().ok().and_then(|id| state.active_quest(id)) {
        return Ok(quest);
    }
    let archived = resolve_id(
        "quest",
        state.completed_quests.iter().map(|q| q.id.as_str()),
        needle,
    );
    if let Some(quest) = archived.ok().and_then(|id| state.archived_quest(&id)) {
        bail!("Quest {} ({}) is already completed", short_id(&quest.id), quest.title);
    }
    let id = active?;
    bail!("Quest {} is not active", short_id(&id))
}

pub async fn quest_toggle_command(session: &Session, quest: &str, subtask: &str) -> Result<()> {
    let state = session.load();
    let target = resolve_active_quest(&state, quest)?;
    let quest_id = target.id.clone();
    let sub_task_id = resolve_sub_task(target, subtask)?;

    let transition = session
        .run(Action::ToggleSubtask {
            quest_id: quest_id.clone(),
            sub_task_id,
        })
        .await?;

    if let Some(quest) = transition.state.active_quest(&quest_id) {
        print_quest(quest);
    }
    Ok(())
}

fn print_quest(quest: &Quest) {
    println!(
        "{} {} [{} d{}] {}/{} (+{} XP, +{} {})",
        short_id(&quest.id),
        quest.title,
        quest.skill,
        quest.difficulty.value(),
        quest.done_count(),
        quest.sub_tasks.len(),
        quest.xp_reward,
        quest.stat_reward,
        quest.skill
    );
    for (i, sub) in quest.sub_tasks.iter().enumerate() {
        let mark = if sub.done { "x" } else { " " };
        println!("    {}. [{}] {}", i + 1, mark, sub.label);
    }
}

pub async fn quest_list_command(session: &Session, all: bool, json: bool) -> Result<()> {
    let transition = session.run(Action::Tick).await?;
    let state = transition.state;

    if json {
        let quests: Vec<&Quest> = if all {
            state.quests.iter().chain(&state.completed_quests).collect()
        } else {
            state.quests.iter().collect()
        };
        println!("{}", serde_json::to_string_pretty(&quests)?);
        return Ok(());
    }

    if state.quests.is_empty() {
        println!("No active quests.");
    } else {
        println!("Active quests ({}):\n", state.quests.len());
        for quest in &state.quests {
            print_quest(quest);
        }
    }

    if all && !state.completed_quests.is_empty() {
        println!("\nCompleted ({}):\n", state.completed_quests.len());
        for quest in &state.completed_quests {
            println!("{} {} [{}]", short_id(&quest.id), quest.title, quest.skill);
        }
    }
    Ok(())
}

pub async fn quest_clear_command(session: &Session, yes: bool) -> Result<()> {
    if !yes {
        bail!("This removes every quest, active and completed. Re-run with --yes to confirm.");
    }
    session.run(Action::ClearQuests).await?;
    println!("All quests cleared.");
    Ok(())
}
