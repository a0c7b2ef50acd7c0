use reqwest::Method;
use tavern_types::api::{CreateCharacterRequest, UpdateCharacterRequest};
use tavern_types::models::Character;

use crate::address::{ResolvedName, Resource, resolve_name};
use crate::error::Result;
use crate::http::{ApiClient, Call};

/// Character CRUD, addressed by display name.
#[derive(Debug, Clone, Copy)]
pub struct Characters<'a> {
    client: &'a ApiClient,
}

fn subject(name: &str) -> String {
    format!("Character '{name}'")
}

impl<'a> Characters<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Character>> {
        let req = self.client.request(Method::GET, Resource::Characters)?;
        self.client.list(req, Call::new("fetch characters", "Characters")).await
    }

    pub async fn get(&self, name: &str) -> Result<Character> {
        let req = self.client.request(Method::GET, Resource::Character(name))?;
        self.client.data(req, Call::new("fetch character", subject(name))).await
    }

    pub async fn create(&self, character: CreateCharacterRequest) -> Result<Character> {
        let name = character.name.clone();
        let req = self
            .client
            .request(Method::POST, Resource::Characters)?
            .json(&character);
        self.client.data(req, Call::new("create character", subject(&name))).await
    }

    pub async fn update(&self, name: &str, changes: UpdateCharacterRequest) -> Result<Character> {
        let req = self
            .client
            .request(Method::PUT, Resource::Character(name))?
            .json(&changes);
        self.client.data(req, Call::new("update character", subject(name))).await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let req = self.client.request(Method::DELETE, Resource::Character(name))?;
        self.client.unit(req, Call::new("delete character", subject(name))).await
    }

    /// Map a slug from a route back to a character name, using the
    /// backend's current list as the authority.
    pub async fn resolve(&self, slug: &str) -> Result<ResolvedName> {
        let names: Vec<String> = self.list().await?.into_iter().map(|c| c.name).collect();
        Ok(resolve_name(slug, &names))
    }
}
