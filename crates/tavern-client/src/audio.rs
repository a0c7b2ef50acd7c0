use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tavern_types::models::Message;

use crate::error::Result;

/// Below this length a bare base64-looking string is treated as a path.
const MIN_BARE_BASE64_LEN: usize = 100;

/// An entry from a message's `audio` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRef<'a> {
    /// Base64 payload returned by unsaved runs, with or without a
    /// `data:audio/...;base64,` prefix.
    Inline(&'a str),
    /// Server-relative location of an archived clip.
    Stored(&'a str),
}

impl<'a> AudioRef<'a> {
    pub fn classify(value: &'a str) -> Self {
        if is_inline(value) {
            Self::Inline(value)
        } else {
            Self::Stored(value)
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// Raw bytes of an inline payload; `None` for stored clips.
    pub fn decode(&self) -> Option<Result<Vec<u8>>> {
        match self {
            Self::Inline(data) => Some(decode_inline(data)),
            Self::Stored(_) => None,
        }
    }
}

fn is_inline(value: &str) -> bool {
    if value.starts_with("data:audio/") {
        return true;
    }
    value.len() > MIN_BARE_BASE64_LEN && is_base64_alphabet(value)
}

/// `^[A-Za-z0-9+/]+=*$`
fn is_base64_alphabet(value: &str) -> bool {
    let body = value.trim_end_matches('=');
    !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Strip an optional `data:audio/<type>;base64,` prefix and decode.
pub fn decode_inline(data: &str) -> Result<Vec<u8>> {
    let payload = data
        .strip_prefix("data:audio/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .unwrap_or(data);
    Ok(STANDARD.decode(payload)?)
}

pub fn audio_refs(message: &Message) -> impl Iterator<Item = AudioRef<'_>> {
    message.audio.iter().map(|a| AudioRef::classify(a))
}
