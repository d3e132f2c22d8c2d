//! Remote profile mirror, leaderboard and friends over a PostgREST-style API
//!
//! All of this is best effort. Nothing read from or written to the backend ever
//! feeds back into `AppState`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::RemoteError;
use crate::config::ProfileSettings;
use crate::domain::{AppState, Gender, SkinTone};
use crate::progression::Transition;

/// Most rows the leaderboard returns
pub const LEADERBOARD_LIMIT: usize = 50;

fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for &b in value.as_bytes() {
        let is_unreserved =
            matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~');
        if is_unreserved {
            out.push(b as char);
        } else {
            out.push('%');
            out.push_str(&format!("{:02X}", b));
        }
    }
    out
}

/// Denormalized public profile row, keyed by user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub username: String,
    pub character_name: String,
    pub class_title: String,
    pub gender: Gender,
    pub skin_tone: SkinTone,
    pub hair_style: String,
    pub hair_color: String,
    pub clothing: String,
    pub weapon: String,
    pub level: u32,
    pub xp: u64,
    pub hp: u32,
    pub mp: u32,
    #[serde(rename = "str")]
    pub strength: u32,
    #[serde(rename = "int")]
    pub intellect: u32,
    #[serde(rename = "agi")]
    pub agility: u32,
    #[serde(rename = "wis")]
    pub wisdom: u32,
    pub streak: u32,
}

impl ProfileRecord {
    pub fn from_state(user_id: &str, username: &str, state: &AppState) -> Self {
        let config = state.character_config.clone().unwrap_or_default();
        Self {
            id: user_id.to_string(),
            username: username.to_string(),
            character_name: state.character_name.clone(),
            class_title: config.class_title,
            gender: config.gender,
            skin_tone: config.skin_tone,
            hair_style: config.hair_style,
            hair_color: config.hair_color,
            clothing: config.clothing,
            weapon: config.weapon,
            level: state.level,
            xp: state.total_xp,
            hp: state.hp,
            mp: state.mp,
            strength: state.stats.strength,
            intellect: state.stats.intellect,
            agility: state.stats.agility,
            wisdom: state.stats.wisdom,
            streak: state.streak.count,
        }
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub character_name: Option<String>,
    #[serde(default)]
    pub class_title: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub streak: u32,
}

impl LeaderboardEntry {
    pub fn display_name(&self) -> &str {
        self.character_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Directed friendship edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendEdge {
    pub user_id: String,
    pub friend_id: String,
}

/// Remote storage for profiles and friend edges
pub trait ProfileBackend: Send + Sync {
    fn upsert_profile(&self, record: &ProfileRecord) -> Result<(), RemoteError>;
    /// Top profiles by XP, highest first
    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RemoteError>;
    /// Ids `user_id` has added as friends
    fn friends_of(&self, user_id: &str) -> Result<BTreeSet<String>, RemoteError>;
    fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<(), RemoteError>;
    fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<(), RemoteError>;
}

/// Flip the friendship edge. Returns whether `friend_id` is a friend afterwards.
///
/// Befriending yourself is a no-op.
pub fn toggle_friend(
    backend: &dyn ProfileBackend,
    user_id: &str,
    friend_id: &str,
) -> Result<bool, RemoteError> {
    if user_id == friend_id {
        return Ok(false);
    }
    if backend.friends_of(user_id)?.contains(friend_id) {
        backend.remove_friend(user_id, friend_id)?;
        Ok(false)
    } else {
        backend.add_friend(user_id, friend_id)?;
        Ok(true)
    }
}

/// PostgREST client
#[derive(Clone)]
pub struct RestProfileBackend {
    base_url: String,
    api_key: String,
    client: ureq::Agent,
}

impl RestProfileBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .build();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Build from settings; the key comes from the configured environment variable
    pub fn from_settings(settings: &ProfileSettings) -> Result<Self, RemoteError> {
        let key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RemoteError::MissingCredential(settings.api_key_env.clone()))?;
        Ok(Self::new(&settings.endpoint, key))
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.client
            .request(method, &format!("{}/{}", self.base_url, path))
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
    }
}

impl ProfileBackend for RestProfileBackend {
    fn upsert_profile(&self, record: &ProfileRecord) -> Result<(), RemoteError> {
        self.request("POST", "profiles")
            .set("Prefer", "resolution=merge-duplicates")
            .send_json(record)?;
        debug!("Upserted profile {}", record.id);
        Ok(())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RemoteError> {
        let path = format!(
            "profiles?select=id,username,character_name,class_title,level,xp,streak&order=xp.desc&limit={}",
            LEADERBOARD_LIMIT
        );
        let mut rows: Vec<LeaderboardEntry> = self
            .request("GET", &path)
            .call()?
            .into_json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        rows.truncate(LEADERBOARD_LIMIT);
        Ok(rows)
    }

    fn friends_of(&self, user_id: &str) -> Result<BTreeSet<String>, RemoteError> {
        let path = format!(
            "friends?select=user_id,friend_id&user_id=eq.{}",
            encode_query_value(user_id)
        );
        let edges: Vec<FriendEdge> = self
            .request("GET", &path)
            .call()?
            .into_json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        Ok(edges.into_iter().map(|e| e.friend_id).collect())
    }

    fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<(), RemoteError> {
        let edge = FriendEdge {
            user_id: user_id.to_string(),
            friend_id: friend_id.to_string(),
        };
        self.request("POST", "friends").send_json(&edge)?;
        Ok(())
    }

    fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<(), RemoteError> {
        let path = format!(
            "friends?user_id=eq.{}&friend_id=eq.{}",
            encode_query_value(user_id),
            encode_query_value(friend_id)
        );
        self.request("DELETE", &path).call()?;
        Ok(())
    }
}

/// Pushes the profile to a backend whenever a transition reports a profile change
#[derive(Clone)]
pub struct ProfileMirror {
    backend: Arc<dyn ProfileBackend>,
    user_id: String,
    username: String,
}

impl ProfileMirror {
    pub fn new(backend: Arc<dyn ProfileBackend>, user_id: &str, username: &str) -> Self {
        Self {
            backend,
            user_id: user_id.to_string(),
            username: username.to_string(),
        }
    }

    /// Spawn a background upsert if `transition` changed the profile.
    ///
    /// Must be called inside a tokio runtime. The handle may be dropped; failures
    /// are only logged.
    pub fn observe(&self, transition: &Transition) -> Option<JoinHandle<()>> {
        if !transition.profile_changed() {
            return None;
        }
        let record = ProfileRecord::from_state(&self.user_id, &self.username, &transition.state);
        let backend = Arc::clone(&self.backend);
        Some(tokio::task::spawn_blocking(move || {
            if let Err(e) = backend.upsert_profile(&record) {
                warn!("Profile mirror failed: {}", e);
            }
        }))
    }
}
