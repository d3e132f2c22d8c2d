use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod cli;
mod commands;

use cli::Session;
use cli::character::Appearance;
use cli::social::FriendOp;
use commands::{
    CharacterCommands, Commands, DailyCommands, FocusCommands, FriendCommands, NamesCommands,
    QuestCommands,
};

#[derive(Parser)]
#[command(name = "questlog")]
#[command(about = "Questlog - level up a character by getting real work done")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.questlog/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the state files (overrides settings.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Init must not auto-create the file it is about to write
    if let Some(Commands::Init { force }) = cli.command {
        return cli::init::init_command(cli.config, force);
    }

    let session = Session::open(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Some(Commands::Status { json }) => {
            cli::status::status_command(&session, json).await?;
        }
        Some(Commands::Init { .. }) => {}
        Some(Commands::Quest { command }) => match command {
            QuestCommands::Add {
                description,
                skill,
                difficulty,
                subtasks,
                title,
            } => {
                cli::quest::quest_add_command(
                    &session,
                    description,
                    skill,
                    difficulty,
                    subtasks,
                    title,
                )
                .await?;
            }
            QuestCommands::Toggle { quest, subtask } => {
                cli::quest::quest_toggle_command(&session, &quest, &subtask).await?;
            }
            QuestCommands::List { all, json } => {
                cli::quest::quest_list_command(&session, all, json).await?;
            }
            QuestCommands::Clear { yes } => {
                cli::quest::quest_clear_command(&session, yes).await?;
            }
        },
        Some(Commands::Daily { command }) => match command {
            DailyCommands::Add {
                description,
                skill,
                title,
            } => {
                cli::daily::daily_add_command(&session, description, skill, title).await?;
            }
            DailyCommands::Toggle { daily } => {
                cli::daily::daily_toggle_command(&session, &daily).await?;
            }
            DailyCommands::List { json } => {
                cli::daily::daily_list_command(&session, json).await?;
            }
        },
        Some(Commands::Focus { command }) => match command {
            FocusCommands::On => cli::focus::focus_on_command(&session).await?,
            FocusCommands::Off => cli::focus::focus_off_command(&session).await?,
        },
        Some(Commands::Character { command }) => match command {
            CharacterCommands::Rename { name } => {
                cli::character::rename_command(&session, &name).await?;
            }
            CharacterCommands::Configure {
                name,
                class_title,
                gender,
                skin_tone,
                hair_style,
                hair_color,
                clothing,
                weapon,
            } => {
                let appearance = Appearance {
                    name,
                    class_title,
                    gender,
                    skin_tone,
                    hair_style,
                    hair_color,
                    clothing,
                    weapon,
                };
                cli::character::configure_command(&session, appearance).await?;
            }
        },
        Some(Commands::Export { path }) => {
            cli::transfer::export_command(&session, path.as_deref())?;
        }
        Some(Commands::Import { path }) => {
            cli::transfer::import_command(&session, &path).await?;
        }
        Some(Commands::Reset { yes }) => {
            cli::transfer::reset_command(&session, yes)?;
        }
        Some(Commands::Leaderboard) => {
            cli::social::leaderboard_command(&session).await?;
        }
        Some(Commands::Friend { command }) => match command {
            FriendCommands::Add { user_id } => {
                cli::social::friend_command(&session, FriendOp::Add, user_id).await?;
            }
            FriendCommands::Remove { user_id } => {
                cli::social::friend_command(&session, FriendOp::Remove, user_id).await?;
            }
            FriendCommands::Toggle { user_id } => {
                cli::social::friend_command(&session, FriendOp::Toggle, user_id).await?;
            }
            FriendCommands::List => {
                cli::social::friend_list_command(&session).await?;
            }
        },
        Some(Commands::Names { command }) => match command {
            NamesCommands::Test => cli::names::names_test_command(&session).await?,
            NamesCommands::Character => cli::names::names_character_command(&session).await?,
        },
        None => {
            // Default: show the character sheet
            cli::status::status_command(&session, false).await?;
        }
    }

    Ok(())
}
