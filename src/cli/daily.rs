//! Daily commands

use anyhow::{Result, bail};

use questlog::domain::Stat;
use questlog::progression::{Action, NewDaily};
use questlog::remote::{NameRequest, generate_or_fallback};

use super::status::dots;
use super::{Session, resolve_id, short_id};

pub async fn daily_add_command(
    session: &Session,
    description: String,
    skill: Stat,
    title: Option<String>,
) -> Result<()> {
    if description.trim().is_empty() {
        bail!("Daily description cannot be empty");
    }

    let title = match title {
        Some(t) => t,
        None => match session.name_generator() {
            Some(generator) => {
                let request = NameRequest::Daily {
                    habit: description.trim().to_string(),
                };
                generate_or_fallback(generator, request, session.name_timeout()).await
            }
            None => String::new(),
        },
    };

    let transition = session
        .run(Action::AddDaily(NewDaily {
            title,
            plain_description: description,
            skill,
        }))
        .await?;

    if let Some(daily) = transition.state.dailies.last() {
        println!("{} {} [{}]", short_id(&daily.id), daily.title, daily.skill);
    }
    Ok(())
}

pub async fn daily_toggle_command(session: &Session, daily: &str) -> Result<()> {
    let state = session.load();
    let daily_id = resolve_id("daily", state.dailies.iter().map(|d| d.id.as_str()), daily)?;

    let transition = session
        .run(Action::ToggleDaily {
            daily_id: daily_id.clone(),
        })
        .await?;

    if let Some(daily) = transition.state.daily(&daily_id) {
        let status = if daily.completed_today { "done" } else { "not done" };
        println!("{} {} {}: {}", dots(daily), short_id(&daily.id), daily.title, status);
    }
    Ok(())
}

pub async fn daily_list_command(session: &Session, json: bool) -> Result<()> {
    let transition = session.run(Action::Tick).await?;
    let dailies = &transition.state.dailies;

    if json {
        println!("{}", serde_json::to_string_pretty(dailies)?);
        return Ok(());
    }

    if dailies.is_empty() {
        println!("No dailies.");
        return Ok(());
    }

    println!("Dailies ({}):\n", dailies.len());
    for daily in dailies {
        let mark = if daily.completed_today { "x" } else { " " };
        println!(
            "  [{}] {} {} {} [{}] {}/7",
            mark,
            dots(daily),
            short_id(&daily.id),
            daily.title,
            daily.skill,
            daily.dots_done()
        );
    }
    Ok(())
}
