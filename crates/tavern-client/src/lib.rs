//! Client for the tavern REST API.
//!
//! Resources are addressed by slugs derived from display names (characters,
//! prompts, chats) or, for jobs, by either a server-issued ID or the legacy
//! `character-prompt` composite slug. See [`address`] for the path rules and
//! [`chats::ChatArchive`] for the chat archive lifecycle.

pub mod address;
pub mod audio;
pub mod cadence;
pub mod characters;
pub mod chats;
pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod prompts;

pub use address::{JobRef, ResolvedName, Resource};
pub use chats::ChatArchive;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::ApiClient;

pub use tavern_types::api;
pub use tavern_types::models;
pub use tavern_types::slug;
