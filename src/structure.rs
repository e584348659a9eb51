//! Structural cleaner — markup, URLs, and token-shape normalization.
//!
//! Every function here is one pipeline sub-step with the contract
//! `fn(text) -> text`.  Steps come in two flavours:
//!
//! * **global** — applied to every non-held token;
//! * **local** — additionally vocabulary-gated: tokens the downstream
//!   tokenizer already knows are never altered.
//!
//! The orchestrator in [`crate::pipeline`] invokes several of these steps
//! more than once; all of them are safe to re-apply.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::placeholder::{hold, is_held, rewrite_free_tokens, rewrite_tokens, PlaceholderKind};
use crate::tables::Tables;

// ─────────────────────────────────────────────────────────────────────────────
// Compiled regexes
// ─────────────────────────────────────────────────────────────────────────────

static RE_ANCHOR_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<a ([^>]*?)>").unwrap());
static RE_HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").unwrap());
static RE_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^<>]+>").unwrap());
static RE_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.+").unwrap());
static RE_EXCLAMATIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"!!+").unwrap());
static RE_QUESTIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?\?+").unwrap());
static RE_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",,+").unwrap());
static RE_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_").unwrap());
static RE_BACKSLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\+").unwrap());
static RE_DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"--+").unwrap());

/// Maximum token length handled by the short-token slash split; longer
/// tokens go through [`break_long_words`] instead.
const LONG_TOKEN_LEN: usize = 20;

const HTML_ENTITIES: &[(&str, &str)] =
    &[("&quot;", ""), ("&amp;", " and "), ("&lt;", ""), ("&gt;", "")];

// ─────────────────────────────────────────────────────────────────────────────
// Small char-class helpers
// ─────────────────────────────────────────────────────────────────────────────

fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '£' | '%' | '€')
}

/// Python-style `str.isnumeric()`: false for the empty string.
pub(crate) fn is_numeric_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_numeric())
}

/// Ratio of characters outside `[a-zA-Z0-9\-.,/']` — the spam heuristic.
fn junk_ratio(token: &str) -> f64 {
    let total = token.chars().count();
    if total == 0 {
        return 0.0;
    }
    let junk = token
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '.' | ',' | '/' | '\''))
        .count();
    junk as f64 / total as f64
}

fn is_reddit_path(token: &str) -> bool {
    token.starts_with("u/") || token.starts_with("r/")
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Why no domain could be extracted from a token.  Callers that only need
/// the best-effort behaviour default to the literal `"url"`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("token {0:?} has no host component")]
    NoHost(String),
    #[error("no recognizable domain labels in {0:?}")]
    NoDomain(String),
}

static RE_DOMAIN_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9-]+\.[a-z]{2,6})$").unwrap());

/// Extract the top two DNS levels from a URL-shaped token
/// (`http://sub.example.com/x` → `example.com`).
pub fn domain_search(token: &str) -> Result<String, DomainError> {
    // authority: after the scheme marker if present, before userinfo/path
    let rest = match token.find("://") {
        Some(idx) => &token[idx + 3..],
        None => token,
    };
    let rest = rest.rsplit_once('@').map(|(_, host)| host).unwrap_or(rest);
    let host = rest
        .split(['/', '?', '#', ':'])
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DomainError::NoHost(token.to_string()))?;
    RE_DOMAIN_TAIL
        .find(host)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DomainError::NoDomain(token.to_string()))
}

fn domain_or_fallback(token: &str) -> String {
    domain_search(token).unwrap_or_else(|_| "url".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Markup
// ─────────────────────────────────────────────────────────────────────────────

/// Strip the first href-bearing anchor tag, preserving inner text.
pub fn strip_anchor_attrs(text: &str) -> String {
    match RE_ANCHOR_OPEN.captures(text) {
        Some(caps) if caps[1].contains("href") => {
            let open_tag = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            text.replace(open_tag, " ").replace("</a>", " ")
        }
        _ => text.to_string(),
    }
}

/// Un-escape the small fixed set of HTML entities, only inside tokens that
/// carry at least one of them.
pub fn unescape_html_entities(text: &str) -> String {
    rewrite_tokens(text, |token| {
        if HTML_ENTITIES.iter().any(|(from, _)| token.contains(from)) {
            let mut out = token.to_string();
            for (from, to) in HTML_ENTITIES {
                out = out.replace(from, to);
            }
            out
        } else {
            token.to_string()
        }
    })
}

/// Remove markup from tokens containing a known HTML tag.
pub fn strip_html_tags(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        let bracketed = token.contains('<') && token.contains('>');
        let known = bracketed
            && tables.html_tags.iter().any(|tag| {
                token.contains(&format!("<{tag}>")) || token.contains(&format!("</{tag}>"))
            });
        if known {
            RE_MARKUP.replace_all(token, " ").into_owned()
        } else {
            token.to_string()
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// URLs
// ─────────────────────────────────────────────────────────────────────────────

/// First URL pass: tokens with an explicit `http(s)://` substring become a
/// `@URL[domain]` placeholder.  A token with more than two characters of
/// leading text keeps that text as a separate word.
pub fn convert_urls(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        let Some(m) = RE_HTTP_URL.find(token) else {
            return token.to_string();
        };
        let placeholder = hold(PlaceholderKind::Url, &domain_or_fallback(m.as_str()));
        if m.start() > 2 {
            format!("{} {}", &token[..m.start()], placeholder)
        } else {
            placeholder
        }
    })
}

/// One-off fixup for the `t.co` shortener artifact.
pub fn drop_shortener_artifacts(text: &str) -> String {
    rewrite_tokens(text, |token| {
        if token == "@URL[t.co]" {
            String::new()
        } else {
            token.to_string()
        }
    })
}

/// Second, widened URL pass using the curated TLD list.
pub fn convert_urls_widened(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        let looks_like_url = if token.contains("file:") {
            true
        } else if token.contains("http")
            // "aww" false-positive guard, only for the "ww." marker
            || (token.contains("ww.") && !token.contains("aww"))
            || token.contains(".htm")
            || token.contains("ftp")
            || token.contains(".php")
            || token.contains(".aspx")
        {
            tables.url_tlds.iter().any(|tld| token.contains(&format!(".{tld}")))
        } else if token.contains('/') && token.contains('.') {
            tables.url_tlds.iter().any(|tld| token.contains(&format!(".{tld}/")))
        } else {
            false
        };

        if looks_like_url {
            hold(PlaceholderKind::Url, &domain_or_fallback(token))
        } else {
            token.to_string()
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Pictograms and emoji
// ─────────────────────────────────────────────────────────────────────────────

/// Replace text-art pictograms with their emoji.  The `strict` pass only
/// converts exact-match tokens; the loose pass also rewrites pictograms
/// (longer than 2 chars) embedded inside a token.
pub fn normalize_pictograms(text: &str, tables: &Tables, strict: bool) -> String {
    let min_symbol_chars = if strict { 1 } else { 2 };
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        let symbol_chars = token.chars().filter(|c| !c.is_ascii_alphanumeric()).count();
        if symbol_chars <= min_symbol_chars {
            return token.to_string();
        }
        for (pict, emoji) in &tables.pictograms {
            if token == pict {
                return emoji.clone();
            }
            if !strict && pict.chars().count() > 2 && token.contains(pict.as_str()) {
                return token.replace(pict.as_str(), emoji);
            }
        }
        token.to_string()
    })
}

/// Surround every emoji character with spaces so it becomes its own token.
pub fn isolate_emoji(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        token
            .chars()
            .map(|c| {
                if tables.is_emoji(c) {
                    format!(" {c} ")
                } else {
                    c.to_string()
                }
            })
            .collect()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Punctuation shape
// ─────────────────────────────────────────────────────────────────────────────

/// Collapse runs of repeated terminal punctuation into the spaced
/// three-repeat form (`!!!!` → `! ! !`).
pub fn normalize_repeated_punct(text: &str, tables: &Tables) -> String {
    let rules: &[(char, &Lazy<Regex>, &str)] = &[
        ('.', &RE_DOTS, " . . . "),
        ('!', &RE_EXCLAMATIONS, " ! ! ! "),
        ('?', &RE_QUESTIONS, " ? ? ? "),
        (',', &RE_COMMAS, " , , , "),
    ];
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        let mut out = token.to_string();
        for (c, re, spaced) in rules {
            if token.chars().filter(|t| t == c).count() > 1 {
                out = re.replace_all(&out, *spaced).into_owned();
            }
        }
        out
    })
}

/// Drop underscores from tokens that are mostly symbol spam.
pub fn remove_spam_underscores(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if !tables.vocabulary.contains(token) && token.contains('_') && junk_ratio(token) > 0.6 {
            RE_UNDERSCORES.replace_all(token, "").into_owned()
        } else {
            token.to_string()
        }
    })
}

/// Collapse a pure repeated-character spam token to a single instance.
pub fn collapse_spam_repeats(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        let mut chars = token.chars();
        let first = chars.next();
        let uniform = first.is_some() && chars.all(|c| Some(c) == first);
        if !tables.vocabulary.contains(token)
            && uniform
            && token.chars().count() > 2
            && junk_ratio(token) > 0.6
        {
            first.map(String::from).unwrap_or_default()
        } else {
            token.to_string()
        }
    })
}

/// Surround bracket and quote characters with spaces.
pub fn isolate_brackets(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        token
            .chars()
            .map(|c| {
                if matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '<' | '>' | '"') {
                    format!(" {c} ")
                } else {
                    c.to_string()
                }
            })
            .collect()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Token breaking
// ─────────────────────────────────────────────────────────────────────────────

/// Space out slashes in short tokens, leaving reddit `u/`/`r/` paths alone.
pub fn split_short_slashes(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        if token.chars().count() <= LONG_TOKEN_LEN && token.contains('/') && !is_reddit_path(token)
        {
            token.replace('/', " / ")
        } else {
            token.to_string()
        }
    })
}

/// One breaking pass over tokens longer than 20 characters: underscores,
/// slashes, or dashes become separators, and interior `,.:;` are spaced out
/// unless the token is numeric once symbols are stripped.  Invoked several
/// times because each pass can expose new long tokens.
pub fn break_long_words(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        if token.chars().count() <= LONG_TOKEN_LEN {
            return token.to_string();
        }
        let mut out = token.to_string();
        if token.contains('_') {
            out = out.replace('_', " ");
        } else if token.contains('/') && !is_reddit_path(token) {
            out = out.replace('/', " / ");
        } else if token.split('-').filter(|p| !p.is_empty()).count() > 2 {
            out = out.replace('-', " ");
        }
        let stripped: String = token
            .chars()
            .filter(|c| !matches!(c, '+' | '#' | '@' | '$' | '/' | ',' | '.' | ':' | ';' | '-'))
            .collect();
        if !is_numeric_token(&stripped) {
            for s in [',', '.', ':', ';'] {
                if out.contains(s) {
                    out = out.replace(s, &format!(" {s} "));
                }
            }
        }
        out
    })
}

/// Split trailing punctuation off a token, keeping a currency/percent sign
/// attached when it directly follows a digit (the numeric parser wants it).
pub fn split_end_punct(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        let chars: Vec<char> = token.chars().collect();
        match chars.last() {
            Some(c) if !c.is_alphanumeric() => {}
            _ => return token.to_string(),
        }
        for i in (1..=chars.len()).rev() {
            if i < chars.len() && chars[i - 1].is_numeric() && is_currency_symbol(chars[i]) {
                break;
            }
            if chars[i - 1].is_alphanumeric() {
                let head: String = chars[..i].iter().collect();
                let tail: String = chars[i..].iter().collect();
                return format!("{head} {tail}");
            }
        }
        token.to_string()
    })
}

/// Trim leading and trailing underscore runs from unknown tokens.
pub fn trim_underscores(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) || !token.contains('_') {
            return token.to_string();
        }
        token.trim_start_matches('_').trim_end_matches('_').to_string()
    })
}

/// Convert backslash runs to a spaced forward slash.
pub fn convert_backslashes(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if !tables.vocabulary.contains(token) && token.contains('\\') {
            RE_BACKSLASHES.replace_all(token, " / ").into_owned()
        } else {
            token.to_string()
        }
    })
}

/// Collapse dash runs, then drop dashes entirely when the joined form is a
/// known vocabulary word (`bit--coin` → `bit-coin`, `bit-co-in` → `bitcoin`
/// if known).
pub fn join_dashes(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        let out = RE_DASH_RUNS.replace_all(token, "-").into_owned();
        if out.chars().filter(|c| *c == '-').count() > 1 {
            let joined: String = out.chars().filter(|c| *c != '-').collect();
            if joined.chars().count() > 3 && tables.vocabulary.contains(&joined) {
                return joined;
            }
        }
        out
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Word-level cleanup
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve multi-dot tokens: URL-shaped ones become a generic
/// `url <domain>` hold, dotted acronyms whose stripped form is known become
/// a hold of that form.
pub fn resolve_acronyms(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token)
            || token.chars().filter(|c| *c == '.').count() <= 1
        {
            return token.to_string();
        }
        if let Ok(domain) = domain_search(token) {
            if token.contains("www") || token.chars().filter(|c| *c == '/').count() > 3 {
                return hold(PlaceholderKind::Generic, &format!("url {domain}"));
            }
        }
        let stripped: String = token.chars().filter(|c| !matches!(c, '.' | ',')).collect();
        let letters = token
            .chars()
            .filter(|c| !c.is_ascii_digit() && !matches!(c, '.' | ',' | '-' | '/' | ':'))
            .count();
        if letters > 0 && tables.vocabulary.contains(&stripped) {
            return hold(PlaceholderKind::Generic, &stripped);
        }
        token.to_string()
    })
}

/// Expand contractions found in the dictionary (`don't` → `do not`).
pub fn expand_contractions(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if !tables.vocabulary.contains(token) && token.contains('\'') {
            tables.contractions.get(token).cloned().unwrap_or_else(|| token.to_string())
        } else {
            token.to_string()
        }
    })
}

/// Strip a possessive `'s` suffix from unknown tokens.
pub fn strip_possessives(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if !tables.vocabulary.contains(token) && token.ends_with("'s") {
            token[..token.len() - 2].to_string()
        } else {
            token.to_string()
        }
    })
}

/// Isolate every remaining character outside `[a-zA-Z0-9*]` with spaces.
pub fn isolate_symbols(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '*') {
            return token.to_string();
        }
        token
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '*' {
                    c.to_string()
                } else {
                    format!(" {c} ")
                }
            })
            .collect()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Tables {
        Tables::default()
    }

    #[test]
    fn test_domain_search() {
        assert_eq!(domain_search("http://example.com/foo").unwrap(), "example.com");
        assert_eq!(domain_search("https://sub.example.co.uk/x?y=1").unwrap(), "co.uk");
        assert_eq!(domain_search("coindesk.com/markets/article").unwrap(), "coindesk.com");
        assert_eq!(domain_search("t.co").unwrap(), "t.co");
    }

    #[test]
    fn test_domain_search_named_failures() {
        assert!(matches!(domain_search("1.5"), Err(DomainError::NoDomain(_))));
        assert!(matches!(domain_search("http://"), Err(DomainError::NoHost(_))));
    }

    #[test]
    fn test_domain_is_substring_of_token() {
        let token = "http://blog.example.com/post/1";
        let domain = domain_search(token).unwrap();
        assert!(token.contains(&domain), "{} not in {}", domain, token);
    }

    #[test]
    fn test_convert_urls_basic() {
        let out = convert_urls("look http://example.com/foo now");
        assert_eq!(out, "look @URL[example.com] now");
    }

    #[test]
    fn test_convert_urls_fallback() {
        // unparseable authority falls back to the literal "url"
        let out = convert_urls("https://%%%");
        assert_eq!(out, "@URL[url]");
    }

    #[test]
    fn test_convert_urls_splits_leading_text() {
        let out = convert_urls("see:http://example.com/x");
        assert_eq!(out, "see: @URL[example.com]");
    }

    #[test]
    fn test_shortener_artifact_dropped() {
        let out = drop_shortener_artifacts(&convert_urls("rt https://t.co/abc123"));
        assert_eq!(out, "rt");
    }

    #[test]
    fn test_widened_url_pass() {
        let t = tables();
        let out = convert_urls_widened("read coindesk.com/markets/btc today", &t);
        assert_eq!(out, "read @URL[coindesk.com] today");
        // "aww" guard
        let out = convert_urls_widened("awww.that.is.cute", &t);
        assert_eq!(out, "awww.that.is.cute");
        // the guard only disables the "ww." marker; other markers still fire
        let out = convert_urls_widened("awww.example.com/ftp", &t);
        assert_eq!(out, "@URL[example.com]");
    }

    #[test]
    fn test_anchor_strip_preserves_inner_text() {
        let out = strip_anchor_attrs("<a href=\"http://x.com\">click</a>");
        let out = rewrite_tokens(&out, |t| t.to_string());
        assert_eq!(out, "click");
    }

    #[test]
    fn test_html_entities() {
        let out = unescape_html_entities("fear &amp; greed &gt;");
        assert_eq!(out, "fear and greed");
    }

    #[test]
    fn test_html_tags_stripped() {
        let out = strip_html_tags("<b>bold</b> stays", &tables());
        assert_eq!(out, "bold stays");
    }

    #[test]
    fn test_repeated_punct() {
        let out = normalize_repeated_punct("moon!!!! soon....", &tables());
        assert_eq!(out, "moon ! ! ! soon . . .");
    }

    #[test]
    fn test_single_punct_untouched() {
        let out = normalize_repeated_punct("fine. ok!", &tables());
        assert_eq!(out, "fine. ok!");
    }

    #[test]
    fn test_spam_repeats_collapsed() {
        let out = collapse_spam_repeats("wow $$$$$$", &tables());
        assert_eq!(out, "wow $");
        // legit words unaffected
        let out = collapse_spam_repeats("aaa", &tables());
        assert_eq!(out, "aaa");
    }

    #[test]
    fn test_spam_underscores() {
        let out = remove_spam_underscores("~_~_~_~", &tables());
        assert_eq!(out, "~~~~");
    }

    #[test]
    fn test_brackets_isolated() {
        let out = isolate_brackets("(wow)");
        assert_eq!(out, "( wow )");
    }

    #[test]
    fn test_short_slash_split_keeps_reddit_paths() {
        let out = split_short_slashes("buy/sell r/bitcoin");
        assert_eq!(out, "buy / sell r/bitcoin");
    }

    #[test]
    fn test_break_long_words() {
        let out = break_long_words("this_is_a_very_long_spam_token");
        assert_eq!(out, "this is a very long spam token");
        let out = break_long_words("one-two-three-four-five-six-s");
        assert_eq!(out, "one two three four five six s");
    }

    #[test]
    fn test_end_punct_split() {
        assert_eq!(split_end_punct("cool..."), "cool ...");
        // currency after a digit stays attached for the number parser
        assert_eq!(split_end_punct("50%"), "50%");
    }

    #[test]
    fn test_underscore_trim() {
        let out = trim_underscores("__wow__", &tables());
        assert_eq!(out, "wow");
    }

    #[test]
    fn test_backslashes() {
        let out = convert_backslashes("either\\\\or", &tables());
        assert_eq!(out, "either / or");
    }

    #[test]
    fn test_join_dashes() {
        let t = Tables::with_vocabulary(["bitcoin"]);
        assert_eq!(join_dashes("bit---coin", &t), "bit-coin");
        assert_eq!(join_dashes("b-i-t-c-o-i-n", &t), "bitcoin");
    }

    #[test]
    fn test_acronyms() {
        let t = Tables::with_vocabulary(["usa"]);
        let out = resolve_acronyms("u.s.a.", &t);
        assert_eq!(out, "word_placeholder[usa]");
        let out = resolve_acronyms("www.example.com", &t);
        assert_eq!(out, "word_placeholder[url___example.com]");
    }

    #[test]
    fn test_contractions() {
        let out = expand_contractions("i don't care", &tables());
        assert_eq!(out, "i do not care");
    }

    #[test]
    fn test_possessive() {
        let out = strip_possessives("elon's rocket", &tables());
        assert_eq!(out, "elon rocket");
    }

    #[test]
    fn test_isolate_symbols() {
        let out = isolate_symbols("wow&ok", &tables());
        assert_eq!(out, "wow & ok");
    }

    #[test]
    fn test_pictograms() {
        let t = tables();
        assert_eq!(normalize_pictograms(":-)", &t, false), "🙂");
        assert_eq!(normalize_pictograms("gm:-)fam", &t, false), "gm🙂fam");
        // strict pass only converts exact matches
        assert_eq!(normalize_pictograms("gm:-)fam", &t, true), "gm:-)fam");
    }

    #[test]
    fn test_emoji_isolation() {
        let t = tables();
        let out = isolate_emoji("to🚀the🌑", &t);
        assert_eq!(out, "to 🚀 the 🌑");
    }

    #[test]
    fn test_vocabulary_gating() {
        // a token in the vocabulary is never altered by local steps
        let t = Tables::with_vocabulary(["u.s.a."]);
        assert_eq!(resolve_acronyms("u.s.a.", &t), "u.s.a.");
    }
}
