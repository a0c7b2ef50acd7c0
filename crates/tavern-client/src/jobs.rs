use reqwest::Method;
use tavern_types::api::{
    CreateJobRequest, RunJobRequest, TestCharacterRequest, TestPromptRequest, UpdateJobRequest,
};
use tavern_types::models::{Character, Job, Message, Prompt};

use crate::address::{JobRef, Resource};
use crate::error::Result;
use crate::http::{ApiClient, Call};

/// Job CRUD and execution. Every single-job operation takes a [`JobRef`], so
/// callers holding only a legacy pair and callers holding an ID share one
/// code path.
#[derive(Debug, Clone, Copy)]
pub struct Jobs<'a> {
    client: &'a ApiClient,
}

impl<'a> Jobs<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Job>> {
        let req = self.client.request(Method::GET, Resource::Jobs)?;
        self.client.list(req, Call::new("fetch jobs", "Jobs")).await
    }

    pub async fn get(&self, job: &JobRef) -> Result<Job> {
        let req = self.client.request(Method::GET, Resource::Job(job))?;
        self.client.data(req, Call::new("fetch job", job.to_string())).await
    }

    /// The returned job carries its server-issued ID.
    pub async fn create(&self, job: CreateJobRequest) -> Result<Job> {
        let req = self.client.request(Method::POST, Resource::Jobs)?.json(&job);
        self.client.data(req, Call::new("create job", "Job")).await
    }

    pub async fn update(&self, job: &JobRef, replacement: UpdateJobRequest) -> Result<Job> {
        let req = self
            .client
            .request(Method::PUT, Resource::Job(job))?
            .json(&replacement);
        self.client.data(req, Call::new("update job", job.to_string())).await
    }

    pub async fn delete(&self, job: &JobRef) -> Result<()> {
        let req = self.client.request(Method::DELETE, Resource::Job(job))?;
        self.client.unit(req, Call::new("delete job", job.to_string())).await
    }

    /// Execute a stored job now. The backend always appends the generated
    /// message to the chosen character's archive.
    pub async fn run(&self, job: &JobRef) -> Result<Message> {
        let req = self.client.request(Method::POST, Resource::RunJob(job))?;
        self.client.data(req, Call::new("run job", job.to_string())).await
    }

    /// Execute a job definition that need not exist on the backend. With
    /// `save_to_chat_history = false` the message is only returned.
    pub async fn run_unsaved(&self, job: &Job, save_to_chat_history: bool) -> Result<Message> {
        let body = RunJobRequest {
            job: job.clone(),
            save_to_chat_history,
        };
        let req = self
            .client
            .request(Method::POST, Resource::RunUnsavedJob)?
            .json(&body);
        self.client.data(req, Call::new("run job", "Job")).await
    }

    /// Try an unsaved prompt against a stored character.
    pub async fn test_prompt(
        &self,
        prompt: &Prompt,
        character_name: &str,
        save_to_chat_history: bool,
    ) -> Result<Message> {
        let body = TestPromptRequest {
            prompt: prompt.clone(),
            character_name: character_name.to_string(),
            save_to_chat_history,
        };
        let req = self
            .client
            .request(Method::POST, Resource::TestPrompt)?
            .json(&body);
        let subject = format!("Character '{character_name}'");
        self.client.data(req, Call::new("test prompt", subject)).await
    }

    /// Try an unsaved character against a stored prompt.
    pub async fn test_character(
        &self,
        character: &Character,
        prompt_name: &str,
        save_to_chat_history: bool,
    ) -> Result<Message> {
        let body = TestCharacterRequest {
            character: character.clone(),
            prompt_name: prompt_name.to_string(),
            save_to_chat_history,
        };
        let req = self
            .client
            .request(Method::POST, Resource::TestCharacter)?
            .json(&body);
        let subject = format!("Prompt '{prompt_name}'");
        self.client.data(req, Call::new("test character", subject)).await
    }
}
