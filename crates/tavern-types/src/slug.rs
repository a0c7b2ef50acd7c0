//! Display name to URL slug projection.
//!
//! The mapping is lossy: case and punctuation collapse, so distinct names may
//! share a slug. Lookups resolve that by first match against a known list.

/// Derive a URL-safe slug from free text.
///
/// Lowercases, drops everything outside ASCII letters, digits, whitespace and
/// `-`, turns each run of whitespace or hyphens into a single `-`, and trims
/// hyphens from both ends. Returns an empty string when nothing survives;
/// an empty slug is not addressable.
pub fn to_slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else if is_separator_space(c) || c == '-' {
            pending_hyphen = true;
        }
        // anything else is stripped without breaking a separator run
    }

    out
}

/// The regex `\s` class URL keys were first minted with. Not the same set
/// as `char::is_whitespace`: U+FEFF is included, U+0085 is not.
fn is_separator_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

pub fn character_slug(name: &str) -> String {
    to_slug(name)
}

pub fn prompt_slug(title: &str) -> String {
    to_slug(title)
}

/// Legacy job slug: `{character_slug}-{prompt_slug}`.
///
/// Each side is slugged on its own before joining so the two components
/// cannot merge through hyphen collapsing.
pub fn job_slug(character: &str, prompt: &str) -> String {
    format!("{}-{}", to_slug(character), to_slug(prompt))
}

/// True when `s` is already in canonical slug form and non-empty.
pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slug() {
        assert_eq!(to_slug("Brave Knight"), "brave-knight");
        assert_eq!(to_slug("Send a Joke Text"), "send-a-joke-text");
        assert_eq!(to_slug("The Jokester!!!"), "the-jokester");
        assert_eq!(to_slug("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(to_slug("Special@#$Characters"), "specialcharacters");
        assert_eq!(to_slug("--Start-and-End--"), "start-and-end");
        assert_eq!(to_slug("tabs\tand\nnewlines"), "tabs-and-newlines");
        assert_eq!(to_slug("a - ! - b"), "a-b");
        assert_eq!(to_slug(""), "");
        assert_eq!(to_slug("a\u{85}b"), "ab");
        assert_eq!(to_slug("a\u{FEFF}b"), "a-b");
    }

    #[test]
    fn test_unicode_spaces_separate() {
        assert_eq!(to_slug("Jane\u{A0}Doe"), "jane-doe");
        assert_eq!(to_slug("Jane\u{3000}Doe"), "jane-doe");
        assert_eq!(to_slug("Jane\u{2009}\u{202F}Doe"), "jane-doe");
        assert_eq!(to_slug("a\u{0B}b\u{0C}c"), "a-b-c");
        // zero-width space is not a separator
        assert_eq!(to_slug("Jane\u{200B}Doe"), "janedoe");
    }

    #[test]
    fn test_underscore_is_stripped() {
        // underscores are removed before separators are collapsed
        assert_eq!(to_slug("snake_case_name"), "snakecasename");
        assert_eq!(to_slug("under _ score"), "under-score");
    }

    #[test]
    fn test_unaddressable_inputs() {
        assert_eq!(to_slug("!!!"), "");
        assert_eq!(to_slug("   "), "");
        assert_eq!(to_slug("---"), "");
        assert_eq!(to_slug("日本語"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Jane Doe",
            "  Mixed CASE -- and   spaces ",
            "Crème brûlée",
            "x_y-z",
            "-",
            "trailing---",
            "Ünïcödé Nämé 42",
            "tab\t\tseparated",
        ];
        for input in inputs {
            let once = to_slug(input);
            assert_eq!(to_slug(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_output_alphabet() {
        let inputs = ["Jane Doe", "A--B", "  x  ", "Hello, World!", "R2-D2 & C-3PO", "???"];
        for input in inputs {
            let slug = to_slug(input);
            assert!(slug.is_empty() || is_slug(&slug), "bad slug {slug:?} for {input:?}");
        }
    }

    #[test]
    fn test_job_slug() {
        assert_eq!(job_slug("Jane Doe", "Morning Greeting"), "jane-doe-morning-greeting");
        assert_eq!(
            job_slug("Brave Knight", "Send a Joke Text"),
            "brave-knight-send-a-joke-text"
        );
        // components are slugged independently
        assert_eq!(job_slug("Jane-", "-Doe"), "jane-doe");
    }

    #[test]
    fn test_is_slug() {
        assert!(is_slug("jane-doe"));
        assert!(is_slug("r2d2"));
        assert!(!is_slug(""));
        assert!(!is_slug("-jane"));
        assert!(!is_slug("jane--doe"));
        assert!(!is_slug("Jane"));
    }
}
