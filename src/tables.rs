//! Reference tables and the known-word vocabulary.
//!
//! Everything the pipeline needs besides the text itself is loaded once per
//! run into an immutable [`Tables`] value and passed by reference into every
//! stage — no process-wide globals.  Callers can supply a full bundle as JSON
//! ([`Tables::from_json`]); any table left empty falls back to the
//! compiled-in defaults.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable set of word-forms the downstream tokenizer already understands.
///
/// Used as an oracle throughout the pipeline: transformations that *guess*
/// (dup-char collapsing, leetspeak, pluralization, dash joining) only commit
/// when the rewritten form is present here.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Vocabulary { words: words.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Every character appearing in any vocabulary word.
    fn charset(&self) -> HashSet<char> {
        self.words.iter().flat_map(|w| w.chars()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled-in defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Punctuation that is always considered known, even outside the vocabulary.
pub const WHITELIST_PUNCT: &str = " '*-.,?!/:;_()[]{}<>=\"";

/// Operator symbols the later stages consume: entity prefixes (`@` `#` `$`),
/// currency signs, numeric modifiers, the HTML-entity ampersand, and the
/// backslash.  Survives both bad-symbol passes; callers with a real
/// tokenizer charset override it via `whitelist_chars`.
pub const DEFAULT_WHITELIST_CHARS: &str = "@#$&%+~^±£€\\|";

const DEFAULT_TLDS: &[&str] = &[
    "com", "net", "org", "io", "co", "uk", "de", "fr", "it", "es", "nl", "ru",
    "jp", "cn", "in", "br", "au", "ca", "ch", "se", "no", "pl", "info", "biz",
    "gov", "edu", "me", "tv", "cc", "xyz", "ly", "gg", "to", "am", "fm",
    "app", "dev", "news",
];

const DEFAULT_HTML_TAGS: &[&str] = &[
    "a", "b", "i", "u", "p", "s", "br", "hr", "em", "strong", "span", "div",
    "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6", "img", "pre",
    "code", "blockquote", "table", "tr", "td", "th", "small", "sub", "sup",
];

const DEFAULT_CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "is not"),
    ("aren't", "are not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("i'd", "i would"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("shouldn't", "should not"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("wasn't", "was not"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("weren't", "were not"),
    ("what's", "what is"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

const DEFAULT_PICTOGRAMS: &[(&str, &str)] = &[
    (":-)", "🙂"),
    (":-(", "🙁"),
    (";-)", "😉"),
    (":')", "🥲"),
    (":'(", "😢"),
    (":-d", "😀"),
    (":-p", "😛"),
    (":-o", "😮"),
    ("<3", "❤"),
    ("\\o/", "🙌"),
];

const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("b4", "before"),
    ("gonna", "going to"),
    ("gotta", "got to"),
    ("hodl", "hold"),
    ("hodling", "holding"),
    ("pls", "please"),
    ("plz", "please"),
    ("thx", "thanks"),
    ("ur", "your"),
    ("wanna", "want to"),
];

/// Unicode look-alikes folded before deaccenting (curly quotes, long dashes).
const DEFAULT_NORMALIZED_CHARS: &[(char, &str)] = &[
    ('‘', "'"),
    ('’', "'"),
    ('‚', "'"),
    ('`', "'"),
    ('´', "'"),
    ('ʼ', "'"),
    ('“', "\""),
    ('”', "\""),
    ('„', "\""),
    ('«', "\""),
    ('»', "\""),
    ('–', "-"),
    ('—', "-"),
    ('―', "-"),
    ('−', "-"),
    ('…', "..."),
];

/// Whether a character is an emoji (pictographic blocks plus a few strays).
pub fn is_emoji_char(c: char) -> bool {
    matches!(u32::from(c),
        0x1F300..=0x1F5FF   // symbols & pictographs
        | 0x1F600..=0x1F64F // emoticons
        | 0x1F680..=0x1F6FF // transport
        | 0x1F900..=0x1F9FF // supplemental symbols
        | 0x1FA70..=0x1FAFF // extended-A
        | 0x2600..=0x26FF   // misc symbols
        | 0x2700..=0x27BF   // dingbats
        | 0x2B00..=0x2BFF   // arrows & stars (⭐ ⬆)
        | 0x2764..=0x2764   // heavy black heart
        | 0x1F1E6..=0x1F1FF // regional indicators
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

/// Serde-facing bundle of reference tables.  Every field is optional; empty
/// tables fall back to the compiled-in defaults when converted to [`Tables`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TablesSpec {
    pub vocabulary: Vec<String>,
    pub normalized_chars: HashMap<String, String>,
    pub url_tlds: Vec<String>,
    pub html_tags: Vec<String>,
    pub contractions: HashMap<String, String>,
    pub pictograms: HashMap<String, String>,
    pub synonyms: HashMap<String, String>,
    pub extra_emoji: Vec<String>,
    pub whitelist_chars: Vec<String>,
}

/// Immutable helper tables shared read-only across all records in a run.
#[derive(Debug, Clone)]
pub struct Tables {
    pub vocabulary: Vocabulary,
    pub normalized_chars: HashMap<char, String>,
    pub url_tlds: Vec<String>,
    pub html_tags: Vec<String>,
    pub contractions: HashMap<String, String>,
    pub pictograms: Vec<(String, String)>,
    pub synonyms: HashMap<String, String>,
    extra_emoji: HashSet<char>,
    whitelist_chars: HashSet<char>,
    whitelist_punct: HashSet<char>,
    vocab_chars: HashSet<char>,
}

impl Default for Tables {
    fn default() -> Self {
        Tables::from_spec(TablesSpec::default())
    }
}

impl Tables {
    pub fn from_spec(spec: TablesSpec) -> Self {
        let vocabulary = Vocabulary::from_words(spec.vocabulary);
        let vocab_chars = vocabulary.charset();

        let normalized_chars = if spec.normalized_chars.is_empty() {
            DEFAULT_NORMALIZED_CHARS
                .iter()
                .map(|(c, to)| (*c, (*to).to_string()))
                .collect()
        } else {
            spec.normalized_chars
                .into_iter()
                .filter_map(|(k, v)| {
                    let mut chars = k.chars();
                    let c = chars.next()?;
                    chars.next().is_none().then(|| (c, v))
                })
                .collect()
        };

        let url_tlds = if spec.url_tlds.is_empty() {
            DEFAULT_TLDS.iter().map(|s| s.to_string()).collect()
        } else {
            spec.url_tlds
        };
        let html_tags = if spec.html_tags.is_empty() {
            DEFAULT_HTML_TAGS.iter().map(|s| s.to_string()).collect()
        } else {
            spec.html_tags
        };
        let contractions = if spec.contractions.is_empty() {
            DEFAULT_CONTRACTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        } else {
            spec.contractions
        };
        // Kept ordered (longest first) so substring matches prefer the most
        // specific pictogram.
        let mut pictograms: Vec<(String, String)> = if spec.pictograms.is_empty() {
            DEFAULT_PICTOGRAMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        } else {
            spec.pictograms.into_iter().collect()
        };
        pictograms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));

        let synonyms = if spec.synonyms.is_empty() {
            DEFAULT_SYNONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        } else {
            spec.synonyms
        };

        let extra_emoji = spec.extra_emoji.iter().flat_map(|s| s.chars()).collect();
        let whitelist_chars = if spec.whitelist_chars.is_empty() {
            DEFAULT_WHITELIST_CHARS.chars().collect()
        } else {
            spec.whitelist_chars.iter().flat_map(|s| s.chars()).collect()
        };
        let whitelist_punct = WHITELIST_PUNCT.chars().collect();

        Tables {
            vocabulary,
            normalized_chars,
            url_tlds,
            html_tags,
            contractions,
            pictograms,
            synonyms,
            extra_emoji,
            whitelist_chars,
            whitelist_punct,
            vocab_chars,
        }
    }

    /// Parse a JSON table bundle (see [`TablesSpec`] for the shape).
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TablesSpec =
            serde_json::from_str(json).context("failed to parse tables JSON")?;
        Ok(Tables::from_spec(spec))
    }

    /// Convenience: default tables with the given vocabulary.
    pub fn with_vocabulary<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tables::from_spec(TablesSpec {
            vocabulary: words.into_iter().map(Into::into).collect(),
            ..TablesSpec::default()
        })
    }

    pub fn is_emoji(&self, c: char) -> bool {
        is_emoji_char(c) || self.extra_emoji.contains(&c)
    }

    /// Whether the downstream tokenizer can represent this character.
    pub fn is_known_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || self.whitelist_punct.contains(&c)
            || self.whitelist_chars.contains(&c)
            || self.vocab_chars.contains(&c)
    }

    pub fn is_whitelisted_punct(&self, c: char) -> bool {
        self.whitelist_punct.contains(&c)
    }

    /// Symbols exempt from both bad-symbol passes.
    pub fn is_whitelisted_char(&self, c: char) -> bool {
        self.whitelist_chars.contains(&c)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
