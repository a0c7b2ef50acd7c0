use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Characters --

/// TTS voice parameters attached to a character. Field names are camelCase
/// on the wire to match the synthesis service's settings schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub temperature: f64,
    pub exaggeration: f64,
    pub cfg_weight: f64,
    pub speed_factor: f64,
    pub voice_name: String,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            exaggeration: 0.4,
            cfg_weight: 0.5,
            speed_factor: 1.0,
            voice_name: "default.wav".to_string(),
        }
    }
}

/// `name` is the identity; the slug is always derived, never stored as one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub personality: String,
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
}

// -- Prompts --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub title: String,
    pub description: String,
    pub context: String,
    pub setup: Vec<String>,
    #[serde(default)]
    pub create_audio: bool,
    #[serde(default)]
    pub create_images: bool,
}

// -- Jobs --

/// Cron-syntax schedule string. Held opaquely: the backend interprets it,
/// the client only displays and forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cadence(String);

impl Cadence {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cadence {
    fn from(expr: &str) -> Self {
        Self::new(expr)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Issued by the backend on create. Jobs written before IDs existed
    /// have none and are only reachable through their legacy slug.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub characters: Vec<String>,
    pub prompts: Vec<String>,
    pub cadence: Cadence,
    #[serde(rename = "prompt-override", default)]
    pub prompt_override: Option<String>,
}

/// What a job execution feeds to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSource<'a> {
    /// The job's `prompt-override`, used verbatim as a single generation.
    Override(&'a str),
    /// The prompt's stored setup steps, generated one after another.
    Setup(&'a [String]),
}

impl Job {
    /// The override wins over whatever the prompt has stored.
    pub fn prompt_source<'a>(&'a self, prompt: &'a Prompt) -> PromptSource<'a> {
        match self.prompt_override.as_deref() {
            Some(text) => PromptSource::Override(text),
            None => PromptSource::Setup(&prompt.setup),
        }
    }
}

// -- Chats --

/// One logical turn: parallel lists of text segments, audio clips and images.
///
/// Audio entries are server-relative paths once archived, or base64 payloads
/// for unsaved test runs. A missing `read` means unread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub audio: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_read(&self) -> bool {
        self.read.unwrap_or(false)
    }

    /// Text segments joined the way list views show them.
    pub fn joined_text(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub character: String,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            messages: vec![],
        }
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_read()).count()
    }
}

/// Display-only projection of a chat for list views. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatListItem {
    pub character: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    pub message_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}
