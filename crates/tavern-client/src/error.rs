use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures surfaced by every client operation. Nothing is retried here;
/// retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum ClientError {
    /// 404: no resource behind the slug, ID or message index.
    #[error("{0}")]
    NotFound(String),

    /// 409: create or rename onto an existing key.
    #[error("{0}")]
    Conflict(String),

    /// Any other non-2xx status.
    #[error("{context}: {status_text}")]
    Transport {
        context: String,
        status: u16,
        status_text: String,
    },

    /// The envelope came back with `success = false`, without required data,
    /// or not as an envelope at all.
    #[error("{0}")]
    Malformed(String),

    /// The display name slugs to nothing and cannot be used in a path.
    #[error("'{0}' has no addressable slug")]
    Unaddressable(String),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid audio payload: {0}")]
    Audio(#[from] base64::DecodeError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// HTTP status behind the failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Transport { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
