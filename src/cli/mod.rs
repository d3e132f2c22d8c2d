//! CLI command implementations

pub mod character;
pub mod daily;
pub mod focus;
pub mod init;
pub mod names;
pub mod quest;
pub mod social;
pub mod status;
pub mod transfer;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{debug, warn};

use questlog::config::Config;
use questlog::domain::{AppState, Clock, SystemClock, UuidIds};
use questlog::progression::{self, Action, ProgressionEvent, Transition};
use questlog::remote::{ChatNameGenerator, NameGenerator, ProfileMirror, RestProfileBackend};
use questlog::store::{FileStore, StateStore};

/// How long a command waits for a background profile upsert before exiting
const MIRROR_GRACE: Duration = Duration::from_secs(5);

/// Everything a command needs: configuration, storage and the clock
pub struct Session {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub store: StateStore<FileStore>,
    pub clock: SystemClock,
}

impl Session {
    pub fn open(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::load_or_default(config_path);
        if let Some(dir) = data_dir {
            config.settings.data_dir = Some(dir);
        }
        let dir = config.data_dir();
        debug!("Using data directory {}", dir.display());

        Ok(Self {
            config,
            config_path: config_path.map(Path::to_path_buf),
            store: StateStore::new(FileStore::new(dir)),
            clock: SystemClock,
        })
    }

    pub fn load(&self) -> AppState {
        self.store.load(self.clock.today())
    }

    /// Load, apply one action, persist and report
    pub async fn run(&self, action: Action) -> Result<Transition> {
        let state = self.load();
        let transition = progression::apply(&state, action, self.clock.moment(), &mut UuidIds);
        self.commit(&transition).await;
        Ok(transition)
    }

    /// Persist a transition, print its events and mirror profile changes.
    ///
    /// A failed save is logged; the command still reports what happened.
    pub async fn commit(&self, transition: &Transition) {
        if !self.store.save_or_warn(&transition.state) {
            eprintln!("Warning: progress could not be saved");
        }
        print_events(&transition.events);

        if let Some(mirror) = self.profile_mirror() {
            if let Some(handle) = mirror.observe(transition) {
                if tokio::time::timeout(MIRROR_GRACE, handle).await.is_err() {
                    debug!("Profile upsert still running at exit");
                }
            }
        }
    }

    /// Name generator, if enabled and a key is available
    pub fn name_generator(&self) -> Option<Arc<dyn NameGenerator>> {
        let settings = &self.config.settings.names;
        if !settings.enabled {
            return None;
        }
        let generator = ChatNameGenerator::from_settings(settings);
        if !generator.has_api_key() {
            debug!("No {} set, skipping name generation", settings.api_key_env);
            return None;
        }
        Some(Arc::new(generator))
    }

    pub fn name_timeout(&self) -> Duration {
        Duration::from_secs(self.config.settings.names.timeout_secs.max(1))
    }

    /// Backend for leaderboard and friends
    pub fn profile_backend(&self) -> Result<RestProfileBackend> {
        let settings = &self.config.settings.profile;
        if !settings.is_configured() {
            bail!(
                "Profile backend is not configured. Set [settings.profile] endpoint and user_id in {}",
                self.config_path
                    .clone()
                    .unwrap_or_else(Config::global_config_path)
                    .display()
            );
        }
        Ok(RestProfileBackend::from_settings(settings)?)
    }

    fn profile_mirror(&self) -> Option<ProfileMirror> {
        let settings = &self.config.settings.profile;
        if !settings.enabled || !settings.is_configured() {
            return None;
        }
        match RestProfileBackend::from_settings(settings) {
            Ok(backend) => Some(ProfileMirror::new(
                Arc::new(backend),
                &settings.user_id,
                &settings.username,
            )),
            Err(e) => {
                warn!("Profile mirror disabled: {}", e);
                None
            }
        }
    }
}

/// Resolve a full id from an exact match or a unique prefix
pub fn resolve_id<'a>(
    kind: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    needle: &str,
) -> Result<String> {
    let needle = needle.trim();
    if needle.is_empty() {
        bail!("Empty {} id", kind);
    }

    let mut matches = Vec::new();
    for id in candidates {
        if id == needle {
            return Ok(id.to_string());
        }
        if id.starts_with(needle) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [] => bail!("No {} matches '{}'", kind, needle),
        [only] => Ok(only.to_string()),
        many => bail!(
            "'{}' is ambiguous: matches {} {}s",
            needle,
            many.len(),
            kind
        ),
    }
}

/// Short form of an id for display
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn describe_event(event: &ProgressionEvent) -> String {
    match event {
        ProgressionEvent::XpAwarded { amount, reason } => format!("+{} XP ({})", amount, reason),
        ProgressionEvent::StatRaised { stat, amount } => format!("+{} {}", amount, stat),
        ProgressionEvent::LevelUp {
            old_level,
            new_level,
        } => format!("Level up! {} -> {}", old_level, new_level),
        ProgressionEvent::AchievementUnlocked { name, .. } => {
            format!("Achievement unlocked: {}", name)
        }
        ProgressionEvent::StreakExtended { count } => format!("Streak: {} day(s)", count),
        ProgressionEvent::ManaRestored { amount } => format!("+{} MP", amount),
        ProgressionEvent::HealthLost {
            amount,
            missed_dailies,
        } => format!("-{} HP ({} daily/dailies missed)", amount, missed_dailies),
        ProgressionEvent::Fainted => {
            "You fainted! Complete tasks to recover.".to_string()
        }
        ProgressionEvent::RecoveryProgress { done, needed } => {
            format!("Recovery {}/{}", done, needed)
        }
        ProgressionEvent::Recovered { hp } => format!("Recovered with {} HP", hp),
        ProgressionEvent::QuestCreated { quest_id } => {
            format!("Created quest {}", short_id(quest_id))
        }
        ProgressionEvent::QuestCompleted { title, .. } => format!("Quest complete: {}", title),
        ProgressionEvent::DailyAdded { daily_id } => format!("Added daily {}", short_id(daily_id)),
        ProgressionEvent::FocusActivated => {
            "Power focus armed: the next completion earns double".to_string()
        }
        ProgressionEvent::FocusConsumed => "Power focus consumed".to_string(),
        ProgressionEvent::FocusCancelled => "Power focus cancelled".to_string(),
        ProgressionEvent::ProfileChanged => "Profile updated".to_string(),
    }
}

pub fn print_events(events: &[ProgressionEvent]) {
    for event in events {
        println!("  {}", describe_event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 3] = ["a1b2c3", "a1ffff", "b77777"];

    #[test]
    fn test_resolve_exact_and_prefix() {
        assert_eq!(resolve_id("quest", IDS, "b7").unwrap(), "b77777");
        assert_eq!(resolve_id("quest", IDS, "a1b").unwrap(), "a1b2c3");
        assert_eq!(resolve_id("quest", IDS, "a1ffff").unwrap(), "a1ffff");
    }

    #[test]
    fn test_resolve_rejects_ambiguous_and_unknown() {
        let err = resolve_id("quest", IDS, "a1").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
        assert!(resolve_id("daily", IDS, "zz").is_err());
        assert!(resolve_id("daily", IDS, "  ").is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_describe_level_up() {
        let text = describe_event(&ProgressionEvent::LevelUp {
            old_level: 1,
            new_level: 2,
        });
        assert_eq!(text, "Level up! 1 -> 2");
    }
}
