//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Directory holding the state files. Defaults to `~/.questlog/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Decorative name generation
    #[serde(default)]
    pub names: NameSettings,

    /// Remote profile mirror, leaderboard and friends
    #[serde(default)]
    pub profile: ProfileSettings,
}

/// OpenAI-compatible chat-completions endpoint used for flavor names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSettings {
    #[serde(default = "default_names_enabled")]
    pub enabled: bool,
    #[serde(default = "default_names_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_names_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_names_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on a single generation, including the network round trip
    #[serde(default = "default_names_timeout")]
    pub timeout_secs: u64,
}

fn default_names_enabled() -> bool {
    true
}

fn default_names_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_names_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_names_key_env() -> String {
    "QUESTLOG_NAMES_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    20
}

fn default_names_timeout() -> u64 {
    5
}

impl Default for NameSettings {
    fn default() -> Self {
        Self {
            enabled: default_names_enabled(),
            endpoint: default_names_endpoint(),
            model: default_names_model(),
            api_key_env: default_names_key_env(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_names_timeout(),
        }
    }
}

/// PostgREST backend for the public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Mirror profile changes after each command
    #[serde(default)]
    pub enabled: bool,
    /// Base REST URL, e.g. `https://<project>.supabase.co/rest/v1`
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_profile_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

fn default_profile_key_env() -> String {
    "QUESTLOG_PROFILE_API_KEY".to_string()
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key_env: default_profile_key_env(),
            user_id: String::new(),
            username: String::new(),
        }
    }
}

impl ProfileSettings {
    /// True when enough is configured to talk to the backend
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.user_id.trim().is_empty()
    }
}
