use std::time::Instant;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tavern_types::models::{Character, Prompt};
use thiserror::Error;
use tracing::{debug, trace};

/// Token budget for a prompt-override generation.
pub const OVERRIDE_MAX_LENGTH: u32 = 200;
/// Token budget for each setup step.
pub const SETUP_MAX_LENGTH: u32 = 1000;

const IM_START: &str = "<|im_start|>";
const IM_END: &str = "<|im_end|>";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generator returned status {0}")]
    Status(u16),

    #[error("generator returned no results")]
    Empty,
}

/// Text completion backend used by job execution.
pub trait Generator: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_length: u32,
    ) -> BoxFuture<'a, Result<String, GenerateError>>;
}

// -- KoboldCpp --

#[derive(Debug, Serialize)]
struct KoboldRequest<'a> {
    max_context_length: u32,
    max_length: u32,
    prompt: &'a str,
    quiet: bool,
    rep_pen: f64,
    rep_pen_range: u32,
    rep_pen_slope: f64,
    temperature: f64,
    tfs: f64,
    top_a: f64,
    top_k: u32,
    top_p: f64,
    typical: f64,
}

#[derive(Debug, Deserialize)]
struct KoboldResponse {
    results: Vec<KoboldResult>,
}

#[derive(Debug, Deserialize)]
struct KoboldResult {
    text: String,
}

/// Client for a KoboldCpp `/api/v1/generate` endpoint.
pub struct KoboldGenerator {
    http: reqwest::Client,
    url: String,
}

impl KoboldGenerator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Generator for KoboldGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_length: u32,
    ) -> BoxFuture<'a, Result<String, GenerateError>> {
        Box::pin(async move {
            let body = KoboldRequest {
                max_context_length: 8192,
                max_length,
                prompt,
                quiet: false,
                rep_pen: 1.0,
                rep_pen_range: 1024,
                rep_pen_slope: 0.7,
                temperature: 0.9,
                tfs: 1.0,
                top_a: 0.0,
                top_k: 100,
                top_p: 0.9,
                typical: 1.0,
            };

            debug!("Sending LLM request to: {}", self.url);
            trace!("Kobold request parameters: {:#?}", body);

            let timer = Instant::now();
            let resp = self.http.post(&self.url).json(&body).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(GenerateError::Status(status.as_u16()));
            }
            debug!("LLM API returned {} in {:?}", status, timer.elapsed());

            let parsed: KoboldResponse = resp.json().await?;
            parsed
                .results
                .into_iter()
                .next()
                .map(|r| r.text)
                .ok_or(GenerateError::Empty)
        })
    }
}

// -- Prompt assembly --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A ChatML conversation rendered for completion: every turn closed, then an
/// open assistant turn for the model to fill.
#[derive(Debug, Default)]
pub struct ChatMl {
    turns: Vec<(Role, String)>,
}

impl ChatMl {
    pub fn system(&mut self, content: impl Into<String>) -> &mut Self {
        self.turns.push((Role::System, content.into()));
        self
    }

    pub fn user(&mut self, content: impl Into<String>) -> &mut Self {
        self.turns.push((Role::User, content.into()));
        self
    }

    pub fn assistant(&mut self, content: impl Into<String>) -> &mut Self {
        self.turns.push((Role::Assistant, content.into()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (role, content) in &self.turns {
            out.push_str(IM_START);
            out.push_str(role.as_str());
            out.push('\n');
            out.push_str(content);
            out.push_str(IM_END);
            out.push('\n');
        }
        out.push_str(IM_START);
        out.push_str(Role::Assistant.as_str());
        out.push('\n');
        out
    }
}

/// Prompt for one setup step. `answered` holds the replies to the steps
/// before it, in order.
pub fn setup_step_prompt(
    character: &Character,
    prompt: &Prompt,
    step: &str,
    answered: &[String],
) -> String {
    let mut chat = ChatMl::default();
    chat.system(format!(
        "You are {}, described as: {}\nPersonality: {}\nBackground: {}\n\nContext: {}",
        character.name,
        character.description,
        character.personality,
        character.background,
        prompt.context
    ));
    for (earlier, reply) in prompt.setup.iter().zip(answered) {
        chat.user(earlier.as_str()).assistant(reply.as_str());
    }
    chat.user(step);
    chat.render()
}

/// The generated reply up to the model's end-of-turn marker, if it wrote one.
pub fn reply_text(raw: &str) -> &str {
    let reply = raw.split(IM_END).next().unwrap_or(raw);
    reply.trim()
}

/// Split a reply into message text segments: `<br>` counts as a line
/// break, lines are trimmed, blank lines dropped.
pub fn reply_lines(reply: &str) -> Vec<String> {
    reply
        .replace("<br>", "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
