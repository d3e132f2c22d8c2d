//! Decorative name generation through an OpenAI-compatible chat endpoint
//!
//! Generated names are flavor only. Callers always have a plain fallback and must
//! never wait on this for a state transition: `generate_or_fallback` bounds the call
//! with a timeout and swallows every failure.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::RemoteError;
use crate::config::NameSettings;
use crate::domain::Stat;

/// Anything that can turn a prompt into a short answer
pub trait NameGenerator: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, RemoteError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Chat-completions client
#[derive(Clone)]
pub struct ChatNameGenerator {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    max_tokens: u32,
    client: ureq::Agent,
}

impl ChatNameGenerator {
    /// Build from settings, reading the API key from the configured environment variable
    pub fn from_settings(settings: &NameSettings) -> Self {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(settings, api_key)
    }

    pub fn new(settings: &NameSettings, api_key: Option<String>) -> Self {
        let client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(settings.timeout_secs.max(1)))
            .build();

        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            api_key_env: settings.api_key_env.clone(),
            max_tokens: settings.max_tokens,
            client,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl NameGenerator for ChatNameGenerator {
    fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(RemoteError::MissingCredential(self.api_key_env.clone()));
        };

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", key))
            .send_json(&request)?
            .into_json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        if let Some(message) = response.error.and_then(|e| e.message) {
            return Err(RemoteError::Malformed(message));
        }

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            Err(RemoteError::Empty)
        } else {
            Ok(text)
        }
    }
}

/// What kind of name to generate
#[derive(Debug, Clone)]
pub enum NameRequest {
    Quest { task: String, skill: Stat },
    Daily { habit: String },
    ClassTitle { character_name: String },
    CharacterName,
}

impl NameRequest {
    pub fn prompt(&self) -> String {
        match self {
            NameRequest::Quest { task, skill } => format!(
                "Generate a dramatic medieval/mystical quest name in 3 words or less for this task: '{}'. \
                 Category: {}. Make it epic and fantasy-flavoured. Examples: 'Reckoning of Returns', \
                 'Siege Upon Backend', 'Arcane Model Codex'. Return only the name, 3 words or fewer. No punctuation.",
                task, skill
            ),
            NameRequest::Daily { habit } => format!(
                "Generate a short medieval quest name in 3 words or less for this daily habit: '{}'. \
                 Sound like a ritual or oath. Examples: 'Scholar Morning Rite', 'Vigil of Codewright'. \
                 Return only the name, 3 words or fewer. No punctuation.",
                habit
            ),
            NameRequest::ClassTitle { character_name } => format!(
                "Generate a short, flavorful fantasy RPG class title in 2 words for a character named '{}'. \
                 Examples: 'Arcane Analyst', 'Market Sage', 'Codewright Knight'. \
                 Return only the title, exactly 2 words, no punctuation.",
                character_name
            ),
            NameRequest::CharacterName => "Generate a short fantasy RPG character name, 1, 2, or 3 words. \
                 Examples: 'Aldric the Bold', 'Jormundan', 'Orion', 'Thorn Oakenshield'. \
                 Return only the name, no punctuation."
                .to_string(),
        }
    }

    pub fn max_words(&self) -> usize {
        match self {
            NameRequest::ClassTitle { .. } => 2,
            _ => 3,
        }
    }

    /// What the caller shows when generation is unavailable
    pub fn fallback(&self) -> String {
        match self {
            NameRequest::Quest { task, .. } => task.clone(),
            NameRequest::Daily { habit } => habit.clone(),
            NameRequest::ClassTitle { .. } => "Wandering Adventurer".to_string(),
            NameRequest::CharacterName => "Hero of Ledger".to_string(),
        }
    }
}

/// Keep at most `n` whitespace-separated words
pub fn trim_words(s: &str, n: usize) -> String {
    s.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Generate a name, failing on any service problem
pub fn generate(generator: &dyn NameGenerator, request: &NameRequest) -> Result<String, RemoteError> {
    let text = generator.complete(&request.prompt())?;
    let name = trim_words(&text, request.max_words());
    if name.is_empty() {
        Err(RemoteError::Empty)
    } else {
        Ok(name)
    }
}

/// Generate a name off the calling task, falling back to the plain text on any
/// failure or when `timeout` elapses
pub async fn generate_or_fallback(
    generator: Arc<dyn NameGenerator>,
    request: NameRequest,
    timeout: Duration,
) -> String {
    let fallback = request.fallback();
    let job = tokio::task::spawn_blocking(move || generate(generator.as_ref(), &request));

    match tokio::time::timeout(timeout, job).await {
        Ok(Ok(Ok(name))) => {
            debug!("Generated name: {}", name);
            name
        }
        Ok(Ok(Err(e))) => {
            warn!("Name generation failed, using fallback: {}", e);
            fallback
        }
        Ok(Err(e)) => {
            warn!("Name generation task failed: {}", e);
            fallback
        }
        Err(_) => {
            warn!("{}", RemoteError::Timeout(timeout));
            fallback
        }
    }
}

/// Human-readable result of a round trip to the service
pub fn test_connection(generator: &dyn NameGenerator) -> String {
    match generator.complete("Reply with exactly: OK") {
        Ok(text) => format!("Name service says: {}", text),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<&'static str, ()>);

    impl NameGenerator for Canned {
        fn complete(&self, _prompt: &str) -> Result<String, RemoteError> {
            match self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(()) => Err(RemoteError::Transport("unreachable".to_string())),
            }
        }
    }

    struct Slow;

    impl NameGenerator for Slow {
        fn complete(&self, _prompt: &str) -> Result<String, RemoteError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok("Too Late".to_string())
        }
    }

    fn quest() -> NameRequest {
        NameRequest::Quest {
            task: "file taxes".to_string(),
            skill: Stat::Wisdom,
        }
    }

    #[test]
    fn test_trim_words() {
        assert_eq!(trim_words("  Reckoning   of Returns Forever ", 3), "Reckoning of Returns");
        assert_eq!(trim_words("Arcane Analyst Supreme", 2), "Arcane Analyst");
        assert_eq!(trim_words("   ", 3), "");
    }

    #[test]
    fn test_generate_trims_answer() {
        let name = generate(&Canned(Ok("Siege of the Ledger Keep")), &quest()).unwrap();
        assert_eq!(name, "Siege of the");
    }

    #[test]
    fn test_generate_rejects_blank() {
        assert!(matches!(
            generate(&Canned(Ok("   ")), &quest()),
            Err(RemoteError::Empty)
        ));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let generator = ChatNameGenerator::new(&NameSettings::default(), None);
        assert!(!generator.has_api_key());
        assert!(matches!(
            generator.complete("hi"),
            Err(RemoteError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(quest().fallback(), "file taxes");
        assert_eq!(NameRequest::CharacterName.fallback(), "Hero of Ledger");
        assert_eq!(
            NameRequest::ClassTitle {
                character_name: "Orion".to_string()
            }
            .fallback(),
            "Wandering Adventurer"
        );
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let generator: Arc<dyn NameGenerator> = Arc::new(Canned(Err(())));
        let name = generate_or_fallback(generator, quest(), Duration::from_secs(1)).await;
        assert_eq!(name, "file taxes");
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let generator: Arc<dyn NameGenerator> = Arc::new(Slow);
        let name = generate_or_fallback(generator, quest(), Duration::from_millis(20)).await;
        assert_eq!(name, "file taxes");
    }

    #[tokio::test]
    async fn test_success_uses_generated_name() {
        let generator: Arc<dyn NameGenerator> = Arc::new(Canned(Ok("Reckoning of Returns")));
        let name = generate_or_fallback(generator, quest(), Duration::from_secs(1)).await;
        assert_eq!(name, "Reckoning of Returns");
    }
}
