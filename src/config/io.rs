//! Configuration file I/O operations

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

/// Commented configuration written on first run and by `questlog init`
pub const DEFAULT_CONFIG: &str = r#"# questlog configuration
# =======================

[settings]
# Where the character state is stored (default: ~/.questlog/data)
# data_dir = "/path/to/data"

# Decorative quest/daily/class names from an OpenAI-compatible endpoint.
# Without an API key every name falls back to the plain text you typed.
[settings.names]
enabled = true
endpoint = "https://api.groq.com/openai/v1/chat/completions"
model = "llama-3.1-8b-instant"
api_key_env = "QUESTLOG_NAMES_API_KEY"
max_tokens = 20
timeout_secs = 5

# Optional public profile, leaderboard and friends (PostgREST API).
# Profile upserts run in the background and never block a command.
[settings.profile]
enabled = false
endpoint = ""
api_key_env = "QUESTLOG_PROFILE_API_KEY"
user_id = ""
username = ""
"#;

impl Config {
    /// Get the global config directory path (~/.questlog/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".questlog")
    }

    /// Get the global config file path (~/.questlog/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a file with atomic write and file locking
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        write_locked(path, &content)
    }

    /// Load configuration from `path`, or the global path when `None`.
    ///
    /// A missing file is created with the commented defaults first.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let global_path = Self::global_config_path();
        let path = path.unwrap_or(global_path.as_path());

        if !path.exists() {
            Self::auto_init(path)?;
        }

        Self::from_file(path)
    }

    /// Like `load`, but falls back to defaults when the file is unreadable
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default configuration: {:#}", e);
                Self::default()
            }
        }
    }

    /// Write the commented default config unless another process got there first
    fn auto_init(path: &Path) -> Result<()> {
        let lock_file = lock(path)?;

        // Re-check after acquiring the lock
        if path.exists() {
            drop(lock_file);
            return Ok(());
        }

        write_atomic(path, DEFAULT_CONFIG)?;
        tracing::info!("Created {}", path.display());
        Ok(())
    }

    /// Write the commented default config, replacing any existing file
    pub fn write_default(path: &Path) -> Result<()> {
        write_locked(path, DEFAULT_CONFIG)
    }
}

fn lock(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    // Separate lock file so the rename below never touches a locked inode
    let lock_path = path.with_extension("toml.lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

    lock_file
        .lock_exclusive()
        .with_context(|| "Failed to acquire config lock")?;

    Ok(lock_file)
}

fn write_locked(path: &Path, content: &str) -> Result<()> {
    let _lock = lock(path)?;
    write_atomic(path, content)
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write config content")?;

    temp_file
        .sync_all()
        .with_context(|| "Failed to sync config file")?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename config file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# questlog configuration"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.settings.profile.enabled = true;
        config.settings.profile.user_id = "u1".to_string();
        config.settings.data_dir = Some(dir.path().join("state"));
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings\nbroken").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
        assert_eq!(Config::load_or_default(Some(&path)), Config::default());
    }
}
