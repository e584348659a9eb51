//! Entity extractor — mentions, hashtags, cashtags, and the vocabulary-
//! checked token repairs (plural folding, duplicate-char collapsing,
//! leetspeak).
//!
//! Extraction is idempotent: a token that already carries a placeholder
//! marker is held and never re-processed, so running any of these stages on
//! stable output is a no-op.

use itertools::Itertools;

use crate::placeholder::{hold, is_held, rewrite_free_tokens, rewrite_tokens, PlaceholderKind};
use crate::structure::is_numeric_token;
use crate::tables::Tables;

// ─────────────────────────────────────────────────────────────────────────────
// Prefix rules
// ─────────────────────────────────────────────────────────────────────────────

/// The entity prefix rules, evaluated in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRule {
    Mention,
    Hashtag,
    UserPath,
    SubredditPath,
    Cashtag,
}

impl TokenRule {
    const PRIORITY: [TokenRule; 5] = [
        TokenRule::Mention,
        TokenRule::Hashtag,
        TokenRule::UserPath,
        TokenRule::SubredditPath,
        TokenRule::Cashtag,
    ];

    fn kind(self) -> PlaceholderKind {
        match self {
            TokenRule::Mention | TokenRule::UserPath => PlaceholderKind::User,
            TokenRule::Hashtag | TokenRule::SubredditPath => PlaceholderKind::Hashtag,
            TokenRule::Cashtag => PlaceholderKind::Currency,
        }
    }

    fn prefix_len(self) -> usize {
        match self {
            TokenRule::Mention | TokenRule::Hashtag | TokenRule::Cashtag => 1,
            TokenRule::UserPath | TokenRule::SubredditPath => 2,
        }
    }

    fn matches(self, token: &str) -> bool {
        match self {
            TokenRule::Mention => token.starts_with('@'),
            TokenRule::Hashtag => token.starts_with('#'),
            TokenRule::UserPath => token.starts_with("u/"),
            TokenRule::SubredditPath => token.starts_with("r/"),
            // cashtags only when the remainder is purely alphabetic
            TokenRule::Cashtag => {
                token.starts_with('$')
                    && token.len() > 1
                    && token[1..].chars().all(|c| c.is_alphabetic())
            }
        }
    }

    /// Match a token against the rules in priority order.
    pub fn for_token(token: &str) -> Option<TokenRule> {
        TokenRule::PRIORITY.into_iter().find(|r| r.matches(token))
    }
}

/// Whether the token qualifies for extraction at all: the interior between
/// the rule prefix and the last character is alphanumeric once possessives
/// and underscores are removed, and the whole token is not just a decorated
/// number.
fn qualifies(token: &str, prefix_len: usize) -> bool {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= prefix_len + 1 {
        return false;
    }
    let interior: String = chars[prefix_len..chars.len() - 1].iter().collect();
    let interior = interior.replace("'s", "").replace('_', "");
    if interior.is_empty() || !interior.chars().all(|c| c.is_alphanumeric()) {
        return false;
    }
    let depreffixed: String = token
        .replace("'s", "")
        .chars()
        .filter(|c| !matches!(c, '#' | '@' | '$' | '/' | ',' | '.' | ':' | ';'))
        .collect();
    !is_numeric_token(&depreffixed)
}

/// Convert recognized entity tokens into typed placeholders.
pub fn extract_entities(text: &str) -> String {
    rewrite_free_tokens(text, |token| {
        let Some(rule) = TokenRule::for_token(token) else {
            return token.to_string();
        };
        if !qualifies(token, rule.prefix_len()) {
            return token.to_string();
        }
        let payload: String = token
            .replace("'s", "")
            .chars()
            .filter(|c| !matches!(c, ',' | '.' | ':' | ';'))
            .skip(rule.prefix_len())
            .collect();
        hold(rule.kind(), &payload)
    })
}

/// Split a token at a mid-word `@`/`#`/`$` so the entity prefix stands
/// alone (`price@btc` → `price @btc`).
pub fn disambiguate_entities(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        for symbol in ['@', '#', '$'] {
            let Some(idx) = token.find(symbol) else { continue };
            let (left, rest) = token.split_at(idx);
            let right = &rest[symbol.len_utf8()..];
            let right_head = right.split(['@', '#', '$']).next().unwrap_or("");
            if !left.is_empty()
                && !right_head.is_empty()
                && right_head.chars().all(|c| c.is_alphanumeric())
            {
                return format!("{left} {symbol}{right}");
            }
            break;
        }
        token.to_string()
    })
}

/// Collapse hashtag/mention placeholders onto an existing currency
/// placeholder with the same payload — currency identity wins ties.
pub fn hashtag_currency_union(texts: &mut [String]) {
    let held: std::collections::HashSet<String> = texts
        .iter()
        .flat_map(|t| t.split_whitespace())
        .filter(|t| is_held(t))
        .map(str::to_string)
        .collect();

    let mut union: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for token in &held {
        if let Some(payload) = token.strip_prefix("@CURR") {
            for tag in ["@HTAG", "@USR"] {
                let variant = format!("{tag}{payload}");
                if held.contains(&variant) {
                    union.insert(variant, token.clone());
                }
            }
        }
    }
    if union.is_empty() {
        return;
    }
    for text in texts.iter_mut() {
        *text = rewrite_tokens(text, |token| {
            union.get(token).cloned().unwrap_or_else(|| token.to_string())
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vocabulary-checked token repairs
// ─────────────────────────────────────────────────────────────────────────────

/// Apply the caller-supplied synonym dictionary to whole tokens.
pub fn apply_synonyms(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        tables.synonyms.get(token).cloned().unwrap_or_else(|| token.to_string())
    })
}

/// Fold `tokens` → `token` when the singular form is already known.
pub fn singularize_plurals(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if token.ends_with('s') && token.chars().count() > 4 && !tables.vocabulary.contains(token)
        {
            let singular = &token[..token.len() - 1];
            if tables.vocabulary.contains(singular) {
                return singular.to_string();
            }
        }
        token.to_string()
    })
}

/// Collapse consecutive repeated letters (`mooon` → `mon`), accepted only
/// when the collapsed form is a known word.
pub fn collapse_dup_chars(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) || !token.chars().all(|c| c.is_alphabetic()) {
            return token.to_string();
        }
        let collapsed: String = token.chars().dedup().collect();
        if collapsed != token && tables.vocabulary.contains(&collapsed) {
            collapsed
        } else {
            token.to_string()
        }
    })
}

/// Leetspeak substitution (`h0dl` → `hodl`), accepted only when the result
/// differs, the input is longer than 2 chars, and the result is known.
pub fn convert_leetspeak(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        let converted: String = token
            .chars()
            .map(|c| match c {
                '0' => 'o',
                '1' => 'i',
                '3' => 'e',
                '$' => 's',
                '@' => 'a',
                other => other,
            })
            .collect();
        if converted != token
            && token.chars().count() > 2
            && tables.vocabulary.contains(&converted)
        {
            converted
        } else {
            token.to_string()
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention() {
        assert_eq!(extract_entities("@elonmusk is based"), "@USR[elonmusk] is based");
    }

    #[test]
    fn test_hashtag() {
        assert_eq!(extract_entities("#bitcoin to the moon"), "@HTAG[bitcoin] to the moon");
    }

    #[test]
    fn test_cashtag_requires_alpha() {
        assert_eq!(extract_entities("$btc pumping"), "@CURR[btc] pumping");
        assert_eq!(extract_entities("$100"), "$100");
    }

    #[test]
    fn test_reddit_paths() {
        assert_eq!(extract_entities("r/cryptocurrency u/satoshi"),
                   "@HTAG[cryptocurrency] @USR[satoshi]");
    }

    #[test]
    fn test_trailing_punct_stripped_from_payload() {
        assert_eq!(extract_entities("@whale:"), "@USR[whale]");
        assert_eq!(extract_entities("#moon,"), "@HTAG[moon]");
    }

    #[test]
    fn test_possessive_stripped_from_payload() {
        assert_eq!(extract_entities("@satoshi's,"), "@USR[satoshi]");
    }

    #[test]
    fn test_numeric_tokens_not_extracted() {
        // "#123" is a decorated number, left for the numeric parser
        assert_eq!(extract_entities("#123"), "#123");
    }

    #[test]
    fn test_idempotent_on_extracted_output() {
        let once = extract_entities("@elonmusk #btc $eth");
        let twice = extract_entities(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_disambiguation() {
        let t = Tables::default();
        assert_eq!(disambiguate_entities("price@btc", &t), "price @btc");
        assert_eq!(disambiguate_entities("wow#moon", &t), "wow #moon");
        // no alnum content on the right: untouched
        assert_eq!(disambiguate_entities("wow#!", &t), "wow#!");
    }

    #[test]
    fn test_union_currency_wins() {
        let mut texts = vec![
            "@HTAG[btc] pumping".to_string(),
            "@CURR[btc] listed".to_string(),
            "@USR[btc] mentioned".to_string(),
        ];
        hashtag_currency_union(&mut texts);
        assert_eq!(texts[0], "@CURR[btc] pumping");
        assert_eq!(texts[1], "@CURR[btc] listed");
        assert_eq!(texts[2], "@CURR[btc] mentioned");
    }

    #[test]
    fn test_union_without_currency_is_noop() {
        let mut texts = vec!["@HTAG[moon] soon".to_string()];
        hashtag_currency_union(&mut texts);
        assert_eq!(texts[0], "@HTAG[moon] soon");
    }

    #[test]
    fn test_plural_folding() {
        let t = Tables::with_vocabulary(["flashlight"]);
        assert_eq!(singularize_plurals("two flashlights", &t), "two flashlight");
        // short tokens and unknown singulars stay
        assert_eq!(singularize_plurals("cats", &t), "cats");
    }

    #[test]
    fn test_dup_chars_need_vocab_hit() {
        let t = Tables::with_vocabulary(["mon"]);
        assert_eq!(collapse_dup_chars("mooooon", &t), "mon");
        // "mon" not in vocab → untouched
        let t2 = Tables::default();
        assert_eq!(collapse_dup_chars("mooooon", &t2), "mooooon");
    }

    #[test]
    fn test_leetspeak() {
        let t = Tables::with_vocabulary(["hold", "moon"]);
        assert_eq!(convert_leetspeak("h0ld", &t), "hold");
        assert_eq!(convert_leetspeak("m00n", &t), "moon");
        // result not in vocabulary → untouched
        assert_eq!(convert_leetspeak("l0l", &t), "l0l");
    }

    #[test]
    fn test_synonyms() {
        let t = Tables::default();
        assert_eq!(apply_synonyms("hodl the line", &t), "hold the line");
    }
}
