//! Character normalizer — the first pipeline stage.
//!
//! Lower-cases, folds Unicode look-alikes, deaccents, strips control and
//! format characters, and transliterates or deletes everything the
//! downstream tokenizer cannot represent.  Characters with no assigned
//! Unicode name are deleted, never left unresolved; nothing in this stage
//! can fail a record.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::placeholder::rewrite_free_tokens;
use crate::tables::Tables;

static RE_DOT_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(dot\)").unwrap());

/// Unicode `C*` categories: controls plus the common format characters
/// (soft hyphen, zero-width and directional marks, BOM).
fn is_control_class(c: char) -> bool {
    c.is_control()
        || matches!(u32::from(c),
            0x00AD
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x2069
            | 0xFEFF)
}

/// Replacement for an unrepresentable character: the last whitespace-separated
/// word of its Unicode name, lower-cased, kept only when it is itself a
/// single character.  Unnamed characters resolve to `None` (deleted).
fn transliterate_char(c: char) -> Option<char> {
    let name = unicode_names2::name(c)?.to_string();
    let last = name.split_whitespace().last()?.to_lowercase();
    let mut chars = last.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

/// Fold known Unicode look-alikes (curly quotes, long dashes) per token.
fn fold_lookalikes(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        token
            .chars()
            .map(|c| match tables.normalized_chars.get(&c) {
                Some(to) => to.clone(),
                None => c.to_string(),
            })
            .collect()
    })
}

/// Remove diacritics: canonical decomposition, then drop combining marks.
fn deaccent(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

fn strip_control_chars(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        token.chars().filter(|c| !is_control_class(*c)).collect()
    })
}

/// First transliteration pass: anything outside the tokenizer charset,
/// the emoji set, and the whitelist is name-substituted or deleted.
fn convert_bad_symbols(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        token
            .chars()
            .filter_map(|c| {
                if tables.is_known_char(c) || tables.is_emoji(c) {
                    Some(c)
                } else {
                    transliterate_char(c)
                }
            })
            .collect()
    })
}

/// Second pass, restricted to non-ASCII codepoints outside the punctuation
/// and symbol whitelists.  The middle dot is always a candidate: its name resolves to
/// "dot", which is longer than one character, so it is stripped.
fn convert_bad_symbols_non_ascii(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        token
            .chars()
            .filter_map(|c| {
                let candidate = c == '·'
                    || (u32::from(c) > 256
                        && !tables.is_whitelisted_punct(c)
                        && !tables.is_whitelisted_char(c)
                        && !tables.is_emoji(c));
                if candidate {
                    transliterate_char(c)
                } else {
                    Some(c)
                }
            })
            .collect()
    })
}

/// Full character-normalization contract: `normalize_chars(text) -> text`.
pub fn normalize_chars(text: &str, tables: &Tables) -> String {
    // Decompose before lower-casing so compatibility forms (fullwidth,
    // mathematical alphabets) come out in their final case.
    let text = deaccent(text);
    // Lower-casing is token-gated too: placeholder tags are case-sensitive
    // and must survive re-entrant passes.
    let text = rewrite_free_tokens(&text, |t| t.to_lowercase());
    let text = fold_lookalikes(&text, tables);
    let text = RE_DOT_LITERAL.replace_all(&text, ".").into_owned();
    let text = strip_control_chars(&text);
    let text = convert_bad_symbols(&text, tables);
    convert_bad_symbols_non_ascii(&text, tables)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
