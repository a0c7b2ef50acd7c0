//! Job execution: pick a character and prompt, generate, optionally archive.

use chrono::Utc;
use rand::seq::IndexedRandom;
use tavern_types::models::{Cadence, Character, Job, Message, Prompt, PromptSource};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::generate::{
    Generator, OVERRIDE_MAX_LENGTH, SETUP_MAX_LENGTH, reply_lines, reply_text, setup_step_prompt,
};
use crate::state::{AppState, blocking};

/// Cadence recorded on the throwaway jobs behind test runs.
const ONCE: &str = "once";

/// Choose one character and one prompt uniformly at random.
fn pick(job: &Job) -> Result<(String, String), ApiError> {
    let mut rng = rand::rng();
    let character = job
        .characters
        .choose(&mut rng)
        .ok_or_else(|| ApiError::BadRequest("Job must have at least one character".into()))?;
    let prompt = job
        .prompts
        .choose(&mut rng)
        .ok_or_else(|| ApiError::BadRequest("Job must have at least one prompt".into()))?;
    Ok((character.clone(), prompt.clone()))
}

pub async fn run_job(state: &AppState, job: Job, save_to_chat_history: bool) -> Result<Message, ApiError> {
    let (character_name, prompt_name) = pick(&job)?;
    info!(
        "Randomly selected character '{}' and prompt '{}' for job execution",
        character_name, prompt_name
    );

    let (character, prompt) = blocking(state, move |db| {
        Ok((db.get_character(&character_name)?, db.get_prompt(&prompt_name)?))
    })
    .await?;

    run_with(state, &job, character, prompt, save_to_chat_history).await
}

/// Run an unsaved prompt against a stored character.
pub async fn test_prompt(
    state: &AppState,
    prompt: Prompt,
    character_name: String,
    save_to_chat_history: bool,
) -> Result<Message, ApiError> {
    let job = throwaway_job(&character_name, &prompt.title);
    let character = blocking(state, move |db| db.get_character(&character_name)).await?;
    run_with(state, &job, character, prompt, save_to_chat_history).await
}

/// Run an unsaved character against a stored prompt.
pub async fn test_character(
    state: &AppState,
    character: Character,
    prompt_name: String,
    save_to_chat_history: bool,
) -> Result<Message, ApiError> {
    let job = throwaway_job(&character.name, &prompt_name);
    let prompt = blocking(state, move |db| db.get_prompt(&prompt_name)).await?;
    run_with(state, &job, character, prompt, save_to_chat_history).await
}

fn throwaway_job(character: &str, prompt: &str) -> Job {
    Job {
        id: None,
        characters: vec![character.to_string()],
        prompts: vec![prompt.to_string()],
        cadence: Cadence::new(ONCE),
        prompt_override: None,
    }
}

async fn run_with(
    state: &AppState,
    job: &Job,
    character: Character,
    prompt: Prompt,
    save_to_chat_history: bool,
) -> Result<Message, ApiError> {
    let text = generate_text(state.generator.as_ref(), job, &character, &prompt).await?;

    let message = Message {
        text,
        audio: vec![],
        images: vec![],
        read: Some(false),
        timestamp: Some(Utc::now()),
    };

    if save_to_chat_history {
        let name = character.name.clone();
        let saved = message.clone();
        // the generated message is returned even when archiving fails
        if let Err(e) = blocking(state, move |db| db.append_message(&name, saved)).await {
            warn!("Failed to save message to chat history: {}", e);
        }
    }

    Ok(message)
}

/// An override is one generation. Otherwise each setup step is its own
/// generation, seeing the replies to the steps before it.
pub async fn generate_text(
    generator: &dyn Generator,
    job: &Job,
    character: &Character,
    prompt: &Prompt,
) -> Result<Vec<String>, ApiError> {
    match job.prompt_source(prompt) {
        PromptSource::Override(text) => {
            let raw = generator.generate(text, OVERRIDE_MAX_LENGTH).await?;
            Ok(reply_lines(reply_text(&raw)))
        }
        PromptSource::Setup(steps) => {
            let mut answered: Vec<String> = Vec::with_capacity(steps.len());
            let mut lines = Vec::new();
            for (i, step) in steps.iter().enumerate() {
                let request = setup_step_prompt(character, prompt, step, &answered);
                let raw = generator.generate(&request, SETUP_MAX_LENGTH).await?;
                let reply = reply_text(&raw).to_string();
                info!("LLM response for setup item {}: {}", i + 1, reply);
                lines.extend(reply_lines(&reply));
                answered.push(reply);
            }
            Ok(lines)
        }
    }
}
