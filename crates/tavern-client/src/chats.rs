//! Per-character chat archives: an ordered, index-addressed message log.
//!
//! Message indices are the only message identity and shift down on delete.
//! Nothing here guards against a concurrent append or delete moving an index
//! between a read and a write; the last write wins.

use futures_util::{StreamExt, stream};
use reqwest::Method;
use tavern_types::api::{
    AddMessageRequest, CreateChatRequest, SetReadRequest, UpdateChatRequest, UpdateMessageRequest,
};
use tavern_types::models::{Chat, ChatListItem};

use crate::address::{Resource, ensure_addressable};
use crate::error::Result;
use crate::http::{ApiClient, Call};

/// `lastMessage` for an archive with nothing to show.
pub const NO_MESSAGES: &str = "No messages yet";
/// `lastMessage` for an archive whose fetch failed during a summary pass.
pub const LOAD_FAILED: &str = "Error loading messages";

#[derive(Debug, Clone, Copy)]
pub struct ChatArchive<'a> {
    client: &'a ApiClient,
}

fn subject(character: &str) -> String {
    format!("Chat for character '{character}'")
}

fn message_subject(character: &str, index: usize) -> String {
    format!("Message {index} in chat for character '{character}'")
}

impl<'a> ChatArchive<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Display names of every archive the backend holds. Unlike the record
    /// listings, a response without `data` is malformed, not empty.
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let req = self.client.request(Method::GET, Resource::Chats)?;
        self.client.data(req, Call::new("fetch chats", "Chats")).await
    }

    pub async fn get(&self, character: &str) -> Result<Chat> {
        let req = self.client.request(Method::GET, Resource::Chat(character))?;
        self.client.data(req, Call::new("fetch chat", subject(character))).await
    }

    pub async fn create(&self, character: &str) -> Result<Chat> {
        let body = CreateChatRequest {
            character: character.to_string(),
        };
        ensure_addressable(character)?;
        let req = self.client.request(Method::POST, Resource::Chats)?.json(&body);
        self.client.data(req, Call::new("create chat", subject(character))).await
    }

    /// Move an archive to a new character name, keeping its messages.
    pub async fn rename(&self, character: &str, new_character: &str) -> Result<Chat> {
        ensure_addressable(new_character)?;
        let body = UpdateChatRequest {
            character: Some(new_character.to_string()),
        };
        let req = self
            .client
            .request(Method::PUT, Resource::Chat(character))?
            .json(&body);
        let call = Call::new("rename chat", format!("Chat for character '{new_character}'"));
        self.client.data(req, call).await
    }

    pub async fn delete(&self, character: &str) -> Result<()> {
        let req = self.client.request(Method::DELETE, Resource::Chat(character))?;
        self.client.unit(req, Call::new("delete chat", subject(character))).await
    }

    /// Append one message built from `parts` and return the whole archive.
    /// The backend creates the archive if it does not exist yet.
    pub async fn append(&self, character: &str, parts: AddMessageRequest) -> Result<Chat> {
        let req = self
            .client
            .request(Method::POST, Resource::ChatMessages(character))?
            .json(&parts);
        self.client.data(req, Call::new("add message", subject(character))).await
    }

    pub async fn update_message(
        &self,
        character: &str,
        index: usize,
        patch: UpdateMessageRequest,
    ) -> Result<Chat> {
        let req = self
            .client
            .request(Method::PUT, Resource::ChatMessage(character, index))?
            .json(&patch);
        let call = Call::new("update message", message_subject(character, index));
        self.client.data(req, call).await
    }

    pub async fn set_read(&self, character: &str, index: usize, read: bool) -> Result<Chat> {
        let req = self
            .client
            .request(Method::PUT, Resource::ChatMessageRead(character, index))?
            .json(&SetReadRequest { read });
        let call = Call::new("update message read status", message_subject(character, index));
        self.client.data(req, call).await
    }

    pub async fn set_all_read(&self, character: &str) -> Result<Chat> {
        let req = self.client.request(Method::PUT, Resource::ChatReadAll(character))?;
        let call = Call::new("mark all messages as read", subject(character));
        self.client.data(req, call).await
    }

    /// Removes the message and shifts every later index down by one.
    pub async fn delete_message(&self, character: &str, index: usize) -> Result<Chat> {
        let req = self
            .client
            .request(Method::DELETE, Resource::ChatMessage(character, index))?;
        let call = Call::new("delete message", message_subject(character, index));
        self.client.data(req, call).await
    }

    /// One row per archive, sorted by character.
    ///
    /// Only the name listing can fail the whole call. A failed fetch for a
    /// single archive yields a degraded row and the pass continues.
    pub async fn list_summaries(&self) -> Result<Vec<ChatListItem>> {
        let names = self.list_names().await?;
        let mut items = Vec::with_capacity(names.len());
        for name in &names {
            items.push(self.summary_for(name).await);
        }
        sort_summaries(&mut items);
        Ok(items)
    }

    /// [`list_summaries`](Self::list_summaries) with up to `limit` fetches in
    /// flight. Same rows, same order.
    pub async fn list_summaries_concurrent(&self, limit: usize) -> Result<Vec<ChatListItem>> {
        let names = self.list_names().await?;
        let mut items: Vec<ChatListItem> = stream::iter(names.iter())
            .map(|name| self.summary_for(name))
            .buffer_unordered(limit.max(1))
            .collect()
            .await;
        sort_summaries(&mut items);
        Ok(items)
    }

    async fn summary_for(&self, name: &str) -> ChatListItem {
        match self.get(name).await {
            Ok(chat) => summarize(&chat),
            Err(e) => {
                tracing::warn!(character = %name, error = %e, "failed to load chat for summary");
                load_failed(name)
            }
        }
    }
}

/// Reduce an archive to its list row.
pub fn summarize(chat: &Chat) -> ChatListItem {
    let last = chat.messages.last();
    let last_message = last
        .map(|m| m.joined_text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_MESSAGES.to_string());

    ChatListItem {
        character: chat.character.clone(),
        last_message: Some(last_message),
        message_count: chat.messages.len(),
        unread_count: Some(chat.unread_count()),
        last_activity: last.and_then(|m| m.timestamp),
    }
}

fn load_failed(name: &str) -> ChatListItem {
    ChatListItem {
        character: name.to_string(),
        last_message: Some(LOAD_FAILED.to_string()),
        message_count: 0,
        unread_count: Some(0),
        last_activity: None,
    }
}

fn sort_summaries(items: &mut [ChatListItem]) {
    items.sort_by(|a, b| a.character.cmp(&b.character));
}
