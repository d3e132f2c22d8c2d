//! Leaderboard and friends commands

use anyhow::{Context, Result};

use questlog::remote::{ProfileBackend, toggle_friend};

use super::Session;

pub async fn leaderboard_command(session: &Session) -> Result<()> {
    let backend = session.profile_backend()?;
    let me = session.config.settings.profile.user_id.clone();

    let (rows, friends) = tokio::task::spawn_blocking(move || {
        let rows = backend.leaderboard()?;
        let friends = backend.friends_of(&me)?;
        Ok::<_, questlog::remote::RemoteError>((rows, friends))
    })
    .await?
    .context("Failed to fetch leaderboard")?;

    if rows.is_empty() {
        println!("No players yet.");
        return Ok(());
    }

    let me = &session.config.settings.profile.user_id;
    for (rank, row) in rows.iter().enumerate() {
        let marker = if &row.id == me {
            "*"
        } else if friends.contains(&row.id) {
            "+"
        } else {
            " "
        };
        println!(
            "{:>3}.{} {:<24} {:<24} L{:<3} {:>7} XP  {}d",
            rank + 1,
            marker,
            row.display_name(),
            row.class_title.as_deref().unwrap_or(""),
            row.level,
            row.xp,
            row.streak
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum FriendOp {
    Add,
    Remove,
    Toggle,
}

pub async fn friend_command(session: &Session, op: FriendOp, friend_id: String) -> Result<()> {
    let backend = session.profile_backend()?;
    let me = session.config.settings.profile.user_id.clone();
    let target = friend_id.clone();

    let now_friend = tokio::task::spawn_blocking(move || match op {
        FriendOp::Add => backend.add_friend(&me, &target).map(|_| true),
        FriendOp::Remove => backend.remove_friend(&me, &target).map(|_| false),
        FriendOp::Toggle => toggle_friend(&backend, &me, &target),
    })
    .await?
    .context("Failed to update friends")?;

    if now_friend {
        println!("Added friend {}", friend_id);
    } else {
        println!("{} is not a friend", friend_id);
    }
    Ok(())
}

pub async fn friend_list_command(session: &Session) -> Result<()> {
    let backend = session.profile_backend()?;
    let me = session.config.settings.profile.user_id.clone();

    let friends = tokio::task::spawn_blocking(move || backend.friends_of(&me))
        .await?
        .context("Failed to fetch friends")?;

    if friends.is_empty() {
        println!("No friends yet.");
    }
    for id in friends {
        println!("  {}", id);
    }
    Ok(())
}
