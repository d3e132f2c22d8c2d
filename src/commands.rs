//! CLI command definitions for questlog.

use clap::Subcommand;

use questlog::domain::{Difficulty, Gender, SkinTone, Stat};

fn parse_stat(s: &str) -> Result<Stat, String> {
    Stat::from_str(s).ok_or_else(|| {
        format!("unknown stat '{}' (expected strength, intellect, agility or wisdom)", s)
    })
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    s.parse::<u8>()
        .ok()
        .and_then(Difficulty::new)
        .ok_or_else(|| {
            format!(
                "difficulty must be a number from {} to {}",
                Difficulty::MIN,
                Difficulty::MAX
            )
        })
}

fn parse_gender(s: &str) -> Result<Gender, String> {
    Gender::from_str(s).ok_or_else(|| format!("unknown gender '{}'", s))
}

fn parse_skin_tone(s: &str) -> Result<SkinTone, String> {
    SkinTone::from_str(s).ok_or_else(|| format!("unknown skin tone '{}' (tone1..tone5)", s))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the character sheet
    Status {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },

    /// Write a default ~/.questlog/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage one-off quests
    Quest {
        #[command(subcommand)]
        command: QuestCommands,
    },

    /// Manage recurring dailies
    Daily {
        #[command(subcommand)]
        command: DailyCommands,
    },

    /// Power focus: double rewards on the next quest completion for 20 MP
    Focus {
        #[command(subcommand)]
        command: FocusCommands,
    },

    /// Name and appearance
    Character {
        #[command(subcommand)]
        command: CharacterCommands,
    },

    /// Write a JSON snapshot of your progress
    Export {
        /// Output file (stdout when omitted)
        path: Option<std::path::PathBuf>,
    },

    /// Restore progress from a JSON snapshot
    Import {
        path: std::path::PathBuf,
    },

    /// Delete all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Top players by XP
    Leaderboard,

    /// Follow or unfollow other players
    Friend {
        #[command(subcommand)]
        command: FriendCommands,
    },

    /// Name generation service
    Names {
        #[command(subcommand)]
        command: NamesCommands,
    },
}

#[derive(Subcommand)]
pub enum QuestCommands {
    /// Create a quest
    Add {
        /// What you actually need to do
        description: String,
        /// Stat the quest trains
        #[arg(long, short = 's', value_parser = parse_stat)]
        skill: Stat,
        /// 1 (trivial) to 5 (legendary)
        #[arg(long, short = 'd', value_parser = parse_difficulty, default_value = "2")]
        difficulty: Difficulty,
        /// A step of the quest (repeatable)
        #[arg(long = "subtask", short = 't')]
        subtasks: Vec<String>,
        /// Quest title (generated when omitted)
        #[arg(long)]
        title: Option<String>,
    },
    /// Tick or untick a subtask
    Toggle {
        /// Quest id or unique prefix
        quest: String,
        /// Subtask id, unique prefix, or 1-based position
        subtask: String,
    },
    /// List active quests
    List {
        /// Include completed quests
        #[arg(long)]
        all: bool,
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Remove all active and completed quests
    Clear {
        /// Confirm
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DailyCommands {
    /// Create a daily
    Add {
        /// The habit
        description: String,
        #[arg(long, short = 's', value_parser = parse_stat)]
        skill: Stat,
        /// Daily title (generated when omitted)
        #[arg(long)]
        title: Option<String>,
    },
    /// Mark today's completion on or off
    Toggle {
        /// Daily id or unique prefix
        daily: String,
    },
    /// List dailies with their last seven days
    List {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum FocusCommands {
    /// Spend mana to arm the focus buff
    On,
    /// Disarm the buff (mana is not refunded)
    Off,
}

#[derive(Subcommand)]
pub enum CharacterCommands {
    /// Change the character name
    Rename { name: String },
    /// Set name and appearance
    Configure {
        /// Character name (generated when omitted)
        #[arg(long)]
        name: Option<String>,
        /// Class title (generated when omitted)
        #[arg(long)]
        class_title: Option<String>,
        #[arg(long, value_parser = parse_gender, default_value = "male")]
        gender: Gender,
        #[arg(long, value_parser = parse_skin_tone, default_value = "tone1")]
        skin_tone: SkinTone,
        #[arg(long, default_value = "short")]
        hair_style: String,
        #[arg(long, default_value = "brown")]
        hair_color: String,
        #[arg(long, default_value = "tunic")]
        clothing: String,
        #[arg(long, default_value = "sword")]
        weapon: String,
    },
}

#[derive(Subcommand)]
pub enum FriendCommands {
    /// Add a friend by user id
    Add { user_id: String },
    /// Remove a friend by user id
    Remove { user_id: String },
    /// Add if absent, remove if present
    Toggle { user_id: String },
    /// List your friends
    List,
}

#[derive(Subcommand)]
pub enum NamesCommands {
    /// Round-trip a test prompt
    Test,
    /// Generate a character name
    Character,
}
