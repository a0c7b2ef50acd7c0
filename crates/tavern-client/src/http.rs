use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tavern_types::api::ApiResponse;

use crate::address::Resource;
use crate::characters::Characters;
use crate::chats::ChatArchive;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::jobs::Jobs;
use crate::prompts::Prompts;

/// Handle to one backend. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

/// What an operation was doing, for error messages.
///
/// `action` completes "Failed to ..." and `subject` names the addressed
/// resource ("Character 'Jane Doe'") for 404 and 409 messages.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    action: &'static str,
    subject: String,
}

impl Call {
    pub(crate) fn new(action: &'static str, subject: impl Into<String>) -> Self {
        Self {
            action,
            subject: subject.into(),
        }
    }

    fn not_found(&self) -> String {
        format!("{} not found", self.subject)
    }

    fn conflict(&self) -> String {
        format!("{} already exists", self.subject)
    }

    fn context(&self) -> String {
        format!("Failed to {}", self.action)
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.normalized_base_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, base_url })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn characters(&self) -> Characters<'_> {
        Characters::new(self)
    }

    pub fn prompts(&self) -> Prompts<'_> {
        Prompts::new(self)
    }

    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(self)
    }

    pub fn chats(&self) -> ChatArchive<'_> {
        ChatArchive::new(self)
    }

    /// Absolute URL for a server-relative path such as a stored audio file.
    /// Values that are already absolute pass through unchanged.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub(crate) fn request(&self, method: Method, resource: Resource<'_>) -> Result<RequestBuilder> {
        let path = resource.path()?;
        tracing::debug!(%method, %path, "api request");
        Ok(self.http.request(method, format!("{}{}", self.base_url, path)))
    }

    /// Send and require `data` in the envelope.
    pub(crate) async fn data<T: DeserializeOwned>(&self, req: RequestBuilder, call: Call) -> Result<T> {
        let envelope = self.execute::<T>(req, &call).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::Malformed(format!("{}: response carried no data", call.context())))
    }

    /// Send a listing request. A missing `data` reads as an empty list.
    pub(crate) async fn list<T: DeserializeOwned>(&self, req: RequestBuilder, call: Call) -> Result<Vec<T>> {
        let envelope = self.execute::<Vec<T>>(req, &call).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Send and discard whatever data comes back.
    pub(crate) async fn unit(&self, req: RequestBuilder, call: Call) -> Result<()> {
        self.execute::<serde_json::Value>(req, &call).await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        call: &Call,
    ) -> Result<ApiResponse<T>> {
        let resp = req.send().await?;
        let status = resp.status();

        match status {
            StatusCode::NOT_FOUND => return Err(ClientError::NotFound(call.not_found())),
            StatusCode::CONFLICT => return Err(ClientError::Conflict(call.conflict())),
            s if !s.is_success() => {
                tracing::warn!(status = s.as_u16(), action = call.action, "api request failed");
                return Err(ClientError::Transport {
                    context: call.context(),
                    status: s.as_u16(),
                    status_text: s.canonical_reason().unwrap_or("Unknown Status").to_string(),
                });
            }
            _ => {}
        }

        let envelope: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| ClientError::Malformed(format!("{}: {e}", call.context())))?;

        if !envelope.success {
            let message = if envelope.message.is_empty() {
                "server reported failure".to_string()
            } else {
                envelope.message
            };
            return Err(ClientError::Malformed(format!("{}: {message}", call.context())));
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_messages() {
        let call = Call::new("fetch character", "Character 'Jane Doe'");
        assert_eq!(call.not_found(), "Character 'Jane Doe' not found");
        assert_eq!(call.conflict(), "Character 'Jane Doe' already exists");
        assert_eq!(call.context(), "Failed to fetch character");
    }

    #[test]
    fn test_resolve_url() {
        let client = ApiClient::new(&ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(
            client.resolve_url("/audio/clip.wav"),
            "http://localhost:3000/audio/clip.wav"
        );
        assert_eq!(
            client.resolve_url("audio/clip.wav"),
            "http://localhost:3000/audio/clip.wav"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example.com/a.wav"),
            "https://cdn.example.com/a.wav"
        );
    }
}
