use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Cadence, Character, Job, Message, Prompt, Voice};

// -- Envelope --

/// Every endpoint answers with this wrapper, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }
}

// -- Characters --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub description: String,
    pub personality: String,
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
}

impl From<CreateCharacterRequest> for Character {
    fn from(req: CreateCharacterRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            personality: req.personality,
            background: req.background,
            voice: req.voice,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCharacterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
}

impl UpdateCharacterRequest {
    pub fn apply(self, character: &mut Character) {
        if let Some(description) = self.description {
            character.description = description;
        }
        if let Some(personality) = self.personality {
            character.personality = personality;
        }
        if let Some(background) = self.background {
            character.background = background;
        }
        if let Some(voice) = self.voice {
            character.voice = Some(voice);
        }
    }
}

// -- Prompts --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePromptRequest {
    pub title: String,
    pub description: String,
    pub context: String,
    pub setup: Vec<String>,
    #[serde(default)]
    pub create_audio: bool,
    #[serde(default)]
    pub create_images: bool,
}

impl From<CreatePromptRequest> for Prompt {
    fn from(req: CreatePromptRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            context: req.context,
            setup: req.setup,
            create_audio: req.create_audio,
            create_images: req.create_images,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePromptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_audio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_images: Option<bool>,
}

impl UpdatePromptRequest {
    pub fn apply(self, prompt: &mut Prompt) {
        if let Some(description) = self.description {
            prompt.description = description;
        }
        if let Some(context) = self.context {
            prompt.context = context;
        }
        if let Some(setup) = self.setup {
            prompt.setup = setup;
        }
        if let Some(create_audio) = self.create_audio {
            prompt.create_audio = create_audio;
        }
        if let Some(create_images) = self.create_images {
            prompt.create_images = create_images;
        }
    }
}

// -- Jobs --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateJobRequest {
    pub characters: Vec<String>,
    pub prompts: Vec<String>,
    pub cadence: Cadence,
    #[serde(rename = "prompt-override", default)]
    pub prompt_override: Option<String>,
}

/// PUT replaces the whole job. `id` is ignored by the backend: the stored
/// record keeps the ID it was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub characters: Vec<String>,
    pub prompts: Vec<String>,
    pub cadence: Cadence,
    #[serde(rename = "prompt-override", default)]
    pub prompt_override: Option<String>,
}

impl From<Job> for UpdateJobRequest {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            characters: job.characters,
            prompts: job.prompts,
            cadence: job.cadence,
            prompt_override: job.prompt_override,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJobRequest {
    pub job: Job,
    #[serde(default = "default_true")]
    pub save_to_chat_history: bool,
}

fn default_true() -> bool {
    true
}

// -- Test runs --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPromptRequest {
    pub prompt: Prompt,
    pub character_name: String,
    #[serde(default)]
    pub save_to_chat_history: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCharacterRequest {
    pub character: Character,
    pub prompt_name: String,
    #[serde(default)]
    pub save_to_chat_history: bool,
}

// -- Chats --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChatRequest {
    pub character: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
}

/// Each part list defaults to empty when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddMessageRequest {
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

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetReadRequest {
    pub read: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMessageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl UpdateMessageRequest {
    pub fn apply(self, message: &mut Message) {
        if let Some(text) = self.text {
            message.text = text;
        }
        if let Some(audio) = self.audio {
            message.audio = audio;
        }
        if let Some(images) = self.images {
            message.images = images;
        }
        if let Some(read) = self.read {
            message.read = Some(read);
        }
    }
}
