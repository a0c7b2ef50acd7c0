//! Maps logical references to request paths, and slugs back to names.

use std::fmt;

use tavern_types::models::Job;
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::slug::to_slug;

// ── Jobs ────────────────────────────────────────────────────────────────

/// The two generations of job addressing. Callers may hold either; the
/// resolver never upgrades one to the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobRef {
    /// Opaque ID issued by the backend on create.
    ById(Uuid),
    /// Legacy `slug(character)-slug(prompt)` addressing, for jobs known only
    /// by their pair.
    ByLegacyComposite { character: String, prompt: String },
}

impl JobRef {
    pub fn legacy(character: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::ByLegacyComposite {
            character: character.into(),
            prompt: prompt.into(),
        }
    }

    /// Prefer the job's ID; fall back to the composite of its first
    /// character and first prompt, which is how the backend keys legacy
    /// records. `None` when neither is available.
    pub fn for_job(job: &Job) -> Option<Self> {
        if let Some(id) = job.id {
            return Some(Self::ById(id));
        }
        let character = job.characters.first()?;
        let prompt = job.prompts.first()?;
        Some(Self::legacy(character.as_str(), prompt.as_str()))
    }

    /// The path segment for this reference.
    pub fn segment(&self) -> Result<String> {
        match self {
            Self::ById(id) => Ok(id.to_string()),
            Self::ByLegacyComposite { character, prompt } => {
                let character_slug = addressable(character)?;
                let prompt_slug = addressable(prompt)?;
                Ok(format!("{character_slug}-{prompt_slug}"))
            }
        }
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "Job with ID '{id}'"),
            Self::ByLegacyComposite { character, prompt } => {
                write!(f, "Job for '{character}' and '{prompt}'")
            }
        }
    }
}

impl From<Uuid> for JobRef {
    fn from(id: Uuid) -> Self {
        Self::ById(id)
    }
}

// ── Paths ───────────────────────────────────────────────────────────────

/// Every endpoint the client talks to.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Characters,
    Character(&'a str),
    Prompts,
    Prompt(&'a str),
    Jobs,
    Job(&'a JobRef),
    RunJob(&'a JobRef),
    /// Body-addressed run of a job that need not be persisted.
    RunUnsavedJob,
    TestPrompt,
    TestCharacter,
    Chats,
    Chat(&'a str),
    ChatMessages(&'a str),
    ChatMessage(&'a str, usize),
    ChatMessageRead(&'a str, usize),
    ChatReadAll(&'a str),
}

impl Resource<'_> {
    /// Server-relative path. Fails with [`ClientError::Unaddressable`] when a
    /// display name slugs to nothing.
    pub fn path(&self) -> Result<String> {
        let path = match *self {
            Self::Characters => "/api/characters".to_string(),
            Self::Character(name) => format!("/api/characters/{}", addressable(name)?),
            Self::Prompts => "/api/prompts".to_string(),
            Self::Prompt(title) => format!("/api/prompts/{}", addressable(title)?),
            Self::Jobs => "/api/jobs".to_string(),
            Self::Job(job) => format!("/api/jobs/{}", job.segment()?),
            Self::RunJob(job) => format!("/api/jobs/{}/run", job.segment()?),
            Self::RunUnsavedJob => "/api/jobs/run".to_string(),
            Self::TestPrompt => "/api/test/prompt".to_string(),
            Self::TestCharacter => "/api/test/character".to_string(),
            Self::Chats => "/api/chats".to_string(),
            Self::Chat(character) => format!("/api/chats/{}", addressable(character)?),
            Self::ChatMessages(character) => {
                format!("/api/chats/{}/messages", addressable(character)?)
            }
            Self::ChatMessage(character, index) => {
                format!("/api/chats/{}/messages/{index}", addressable(character)?)
            }
            Self::ChatMessageRead(character, index) => {
                format!("/api/chats/{}/messages/{index}/read", addressable(character)?)
            }
            Self::ChatReadAll(character) => {
                format!("/api/chats/{}/read-all", addressable(character)?)
            }
        };
        Ok(path)
    }
}

/// Fails with [`ClientError::Unaddressable`] when `name` has no slug, for
/// calls that carry the name in a body rather than the path.
pub fn ensure_addressable(name: &str) -> Result<()> {
    addressable(name).map(|_| ())
}

fn addressable(name: &str) -> Result<String> {
    let slug = to_slug(name);
    if slug.is_empty() {
        return Err(ClientError::Unaddressable(name.to_string()));
    }
    Ok(slug)
}

// ── Reverse mapping ─────────────────────────────────────────────────────

/// Outcome of mapping a slug back to a display name.
///
/// Only `Exact` names are real identities. An `Approximate` name is fine to
/// show but must never be sent back as a key: carry the canonical name
/// forward instead of rebuilding it from a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    Exact(String),
    Approximate(String),
}

impl ResolvedName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(name) | Self::Approximate(name) => name,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    pub fn exact(self) -> Option<String> {
        match self {
            Self::Exact(name) => Some(name),
            Self::Approximate(_) => None,
        }
    }
}

impl fmt::Display for ResolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Title-case each hyphen-delimited token: `"jane-doe"` → `"Jane Doe"`.
pub fn approximate_name(slug: &str) -> String {
    slug.split('-')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve `slug` against `known` names: the first name whose slug matches
/// wins, in the order given. Without a match, fall back to
/// [`approximate_name`].
pub fn resolve_name<S: AsRef<str>>(slug: &str, known: &[S]) -> ResolvedName {
    let target = to_slug(slug);
    known
        .iter()
        .map(AsRef::as_ref)
        .find(|name| !target.is_empty() && to_slug(name) == target)
        .map(|name| ResolvedName::Exact(name.to_string()))
        .unwrap_or_else(|| ResolvedName::Approximate(approximate_name(slug)))
}
