//! Typed placeholders for extracted entities.
//!
//! Extracted entities (URLs, mentions, hashtags, cashtags, numbers) are
//! serialized back into the text as `<TAG>[payload]` tokens so that later
//! plain-text passes do not re-process them.  A token containing any tag
//! literal is *held*: every stage must leave it untouched.
//!
//! Payload invariant: the payload never contains the delimiter characters.
//! Spaces are escaped as `___` and square brackets are dropped on encode.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag of the generic (untyped) placeholder.
pub const GENERIC_TAG: &str = "word_placeholder";

/// All tag literals that mark a token as held.
pub const HELD_TAGS: &[&str] = &[GENERIC_TAG, "@URL", "@USR", "@NUM", "@HTAG", "@CURR"];

static RE_ESCAPED_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"___").unwrap());

/// The entity classes a placeholder can stand in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Url,
    User,
    Hashtag,
    Currency,
    Number,
    Generic,
}

impl PlaceholderKind {
    pub fn tag(self) -> &'static str {
        match self {
            PlaceholderKind::Url => "@URL",
            PlaceholderKind::User => "@USR",
            PlaceholderKind::Hashtag => "@HTAG",
            PlaceholderKind::Currency => "@CURR",
            PlaceholderKind::Number => "@NUM",
            PlaceholderKind::Generic => GENERIC_TAG,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "@URL" => Some(PlaceholderKind::Url),
            "@USR" => Some(PlaceholderKind::User),
            "@HTAG" => Some(PlaceholderKind::Hashtag),
            "@CURR" => Some(PlaceholderKind::Currency),
            "@NUM" => Some(PlaceholderKind::Number),
            GENERIC_TAG => Some(PlaceholderKind::Generic),
            _ => None,
        }
    }
}

/// A typed, delimited marker standing in for an extracted entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub payload: String,
}

impl Placeholder {
    /// Build a placeholder, escaping the payload so it round-trips through
    /// whitespace tokenization (` ` → `___`, delimiters dropped).
    pub fn new(kind: PlaceholderKind, payload: &str) -> Self {
        let escaped: String = payload
            .chars()
            .filter(|c| *c != '[' && *c != ']')
            .collect::<String>()
            .replace(' ', "___");
        Placeholder { kind, payload: escaped }
    }

    /// Serialize into the in-text token form `TAG[payload]`.
    pub fn encode(&self) -> String {
        format!("{}[{}]", self.kind.tag(), self.payload)
    }

    /// Parse a single token back into a placeholder, if it is one.
    pub fn parse(token: &str) -> Option<Placeholder> {
        let open = token.find('[')?;
        if !token.ends_with(']') {
            return None;
        }
        let kind = PlaceholderKind::from_tag(&token[..open])?;
        let payload = &token[open + 1..token.len() - 1];
        Some(Placeholder { kind, payload: payload.to_string() })
    }

    /// The payload with the space escaping undone.
    pub fn unescaped_payload(&self) -> String {
        RE_ESCAPED_SPACE.replace_all(&self.payload, " ").into_owned()
    }
}

/// Shorthand: encode `payload` under `kind` straight to its token form.
pub fn hold(kind: PlaceholderKind, payload: &str) -> String {
    Placeholder::new(kind, payload).encode()
}

/// Whether a token is immutable because it contains a placeholder marker.
pub fn is_held(token: &str) -> bool {
    HELD_TAGS.iter().any(|tag| token.contains(tag))
}

// ─────────────────────────────────────────────────────────────────────────────
// Token rewriting helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrite every whitespace-separated token through `f` and re-join with
/// single spaces.  Replacements may themselves contain (or be) spaces; the
/// result is re-tokenized so downstream stages always see clean tokens.
pub fn rewrite_tokens<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mapped = text.split_whitespace().map(|t| f(t)).collect::<Vec<_>>().join(" ");
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`rewrite_tokens`] but held tokens pass through unchanged.
pub fn rewrite_free_tokens<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    rewrite_tokens(text, |t| if is_held(t) { t.to_string() } else { f(t) })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_parse_round_trip() {
        let p = Placeholder::new(PlaceholderKind::Url, "example.com");
        let token = p.encode();
        assert_eq!(token, "@URL[example.com]");
        let back = Placeholder::parse(&token).unwrap();
        assert_eq!(back.kind, PlaceholderKind::Url);
        assert_eq!(back.payload, "example.com");
    }

    #[test]
    fn test_payload_never_contains_delimiters() {
        let p = Placeholder::new(PlaceholderKind::Generic, "url [example.com]");
        assert!(!p.payload.contains('['), "got: {}", p.payload);
        assert!(!p.payload.contains(']'), "got: {}", p.payload);
        assert_eq!(p.unescaped_payload(), "url example.com");
    }

    #[test]
    fn test_space_escaping() {
        let p = Placeholder::new(PlaceholderKind::Generic, "url example.com");
        assert_eq!(p.encode(), "word_placeholder[url___example.com]");
        assert_eq!(p.unescaped_payload(), "url example.com");
    }

    #[test]
    fn test_held_detection() {
        assert!(is_held("@URL[t.co]"));
        assert!(is_held("word_placeholder[abc]"));
        assert!(is_held("x@NUM[1.0]y"));
        assert!(!is_held("@username"));
        assert!(!is_held("plain"));
    }

    #[test]
    fn test_rewrite_skips_held() {
        let out = rewrite_free_tokens("a @URL[t.co] b", |t| t.to_uppercase());
        assert_eq!(out, "A @URL[t.co] B");
    }

    #[test]
    fn test_rewrite_normalizes_whitespace() {
        let out = rewrite_tokens("a   b\tc", |t| t.to_string());
        assert_eq!(out, "a b c");
    }

    #[test]
    fn test_parse_rejects_plain_tokens() {
        assert!(Placeholder::parse("hello").is_none());
        assert!(Placeholder::parse("@usr[x]").is_none());
        assert!(Placeholder::parse("@URL[unclosed").is_none());
    }
}
