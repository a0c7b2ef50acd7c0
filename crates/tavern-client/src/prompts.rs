use reqwest::Method;
use tavern_types::api::{CreatePromptRequest, UpdatePromptRequest};
use tavern_types::models::Prompt;

use crate::address::{ResolvedName, Resource, resolve_name};
use crate::error::Result;
use crate::http::{ApiClient, Call};

/// Prompt CRUD, addressed by title.
#[derive(Debug, Clone, Copy)]
pub struct Prompts<'a> {
    client: &'a ApiClient,
}

fn subject(title: &str) -> String {
    format!("Prompt '{title}'")
}

impl<'a> Prompts<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Prompt>> {
        let req = self.client.request(Method::GET, Resource::Prompts)?;
        self.client.list(req, Call::new("fetch prompts", "Prompts")).await
    }

    pub async fn get(&self, title: &str) -> Result<Prompt> {
        let req = self.client.request(Method::GET, Resource::Prompt(title))?;
        self.client.data(req, Call::new("fetch prompt", subject(title))).await
    }

    pub async fn create(&self, prompt: CreatePromptRequest) -> Result<Prompt> {
        let title = prompt.title.clone();
        let req = self
            .client
            .request(Method::POST, Resource::Prompts)?
            .json(&prompt);
        self.client.data(req, Call::new("create prompt", subject(&title))).await
    }

    pub async fn update(&self, title: &str, changes: UpdatePromptRequest) -> Result<Prompt> {
        let req = self
            .client
            .request(Method::PUT, Resource::Prompt(title))?
            .json(&changes);
        self.client.data(req, Call::new("update prompt", subject(title))).await
    }

    pub async fn delete(&self, title: &str) -> Result<()> {
        let req = self.client.request(Method::DELETE, Resource::Prompt(title))?;
        self.client.unit(req, Call::new("delete prompt", subject(title))).await
    }

    pub async fn resolve(&self, slug: &str) -> Result<ResolvedName> {
        let titles: Vec<String> = self.list().await?.into_iter().map(|p| p.title).collect();
        Ok(resolve_name(slug, &titles))
    }
}
