//! Numeric token parser — `1.5k` → `@NUM[1500.0]`.
//!
//! Recognizes an optional modifier prefix, an optional currency symbol, a
//! digit run with decimal separators, and an optional trailing scale or unit
//! suffix.  Range-like tokens (`5-10`) are not parsed terminally: they are
//! split into separate words and picked up again on the next numbers pass,
//! which is why the orchestrator re-runs this stage several times.

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::placeholder::{hold, rewrite_free_tokens, PlaceholderKind};
use crate::tables::Tables;

// ─────────────────────────────────────────────────────────────────────────────
// Fixed translation tables
// ─────────────────────────────────────────────────────────────────────────────

const SCALE_SUFFIXES: &[(&str, f64)] = &[
    ("b", 1e9),
    ("bn", 1e9),
    ("bln", 1e9),
    ("billion", 1e9),
    ("m", 1e6),
    ("mn", 1e6),
    ("mln", 1e6),
    ("million", 1e6),
    ("k", 1e3),
    ("thousand", 1e3),
    ("-", -1.0),
];

const CURRENCY_WORDS: &[(char, &str)] =
    &[('$', "dollar"), ('£', "pound"), ('%', "percent"), ('€', "euro")];

const UNIT_SUFFIXES: &[(&str, &str)] = &[("x", "times")];

/// Ordered: `+-` and `*#` must be probed before their one-char forms.
const PREFIX_WORDS: &[(&str, &str)] = &[
    ("~", "around"),
    ("+-", "around"),
    ("±", "around"),
    ("@", "at"),
    ("=", "equals"),
    ("*#", "ranked"),
    ("#", "ranked"),
];

static RE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(~|\+-|±|@|=|#|\*#)?[-@+*^#:]?[$£%€]?(([.:]?[0-9])+)[$£%€]?").unwrap()
});
static RE_DECIMAL_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([0-9]{1,2})$").unwrap());
// Malformed `<currency><sign><digit>` ordering, e.g. `$-5`
static RE_SWAPPED_SIGN: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"^[$£%€][-+](?=[0-9])").unwrap());

fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '£' | '%' | '€')
}

fn currency_word(c: char) -> Option<&'static str> {
    CURRENCY_WORDS.iter().find(|(sym, _)| *sym == c).map(|(_, w)| *w)
}

// ─────────────────────────────────────────────────────────────────────────────
// Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed numeric token, before rendering back to text.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberToken {
    /// Modifier word from the prefix symbol (`~` → "around").
    pub prefix: Option<&'static str>,
    /// Currency word, if a currency symbol appeared in the numeric span.
    pub currency: Option<&'static str>,
    /// Final value: `round(digits * multiplier, 2)`.
    pub value: f64,
    /// Unit suffix carried through ("times") or passed along verbatim.
    pub suffix: String,
}

/// Parse outcome: either a finished descriptor or a range rewrite that must
/// be re-queued through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberParse {
    Token(NumberToken),
    /// `5-10` → `5 10`, to be re-parsed as two tokens on the next pass.
    Range(String),
}

impl NumberToken {
    /// Render as `<prefix?> @NUM[value] <currency?> <suffix?>`.
    pub fn render(&self) -> String {
        let number = hold(PlaceholderKind::Number, &format_value(self.value));
        [
            self.prefix.unwrap_or(""),
            &number,
            self.currency.unwrap_or(""),
            &self.suffix,
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// `1500` → `"1500.0"`, `-3.25` → `"-3.25"` (Python `str(round(x, 2))` form).
fn format_value(v: f64) -> String {
    if v == v.trunc() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

fn strip_separators(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '`'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Parse a single token as a numeric expression.
pub fn parse_number(token: &str) -> Option<NumberParse> {
    let mut prefilter = strip_separators(token);
    if RE_SWAPPED_SIGN.is_match(&prefilter).unwrap_or(false) {
        let mut chars: Vec<char> = prefilter.chars().collect();
        chars.swap(0, 1);
        prefilter = chars.into_iter().collect();
    }

    let m = RE_NUMBER.find(&prefilter)?;

    // Internal dash: a range (or malformed compound), split and re-queue.
    // Checked after the sign swap so `$-5` parses instead of splitting.
    if prefilter.contains('-') && !prefilter.starts_with('-') && !prefilter.starts_with("+-") {
        return Some(NumberParse::Range(
            prefilter.split('-').collect::<Vec<_>>().join(" "),
        ));
    }

    let mut main_part = prefilter[..m.end()].to_string();
    let mut prefix = None;
    for (key, word) in PREFIX_WORDS {
        if main_part.starts_with(key) {
            prefix = Some(*word);
            main_part = main_part.replacen(key, "", 1);
            break;
        }
    }

    // At most one residual leading marker survives the prefix strip.
    let mut main = match main_part.chars().next() {
        Some(c) if matches!(c, '~' | '@' | '+' | '*' | '^' | '#' | ':') => {
            main_part[c.len_utf8()..].to_string()
        }
        _ => main_part,
    };

    let currency = main.chars().find(|c| is_currency_symbol(*c)).and_then(currency_word);
    main.retain(|c| !is_currency_symbol(c));
    let mut suffix = prefilter[m.end()..].to_string();

    let mut multiplier = 1.0_f64;
    if let Some(caps) = RE_DECIMAL_TAIL.captures(&main) {
        multiplier *= if caps[1].len() == 1 { 0.1 } else { 0.01 };
    }
    if main.contains('-') {
        multiplier *= -1.0;
        main.retain(|c| c != '-');
    }
    if let Some((_, scale)) = SCALE_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        multiplier *= scale;
        suffix.clear();
    } else if let Some((_, word)) = UNIT_SUFFIXES.iter().find(|(u, _)| *u == suffix) {
        suffix = (*word).to_string();
    }

    let digits: String = main.chars().filter(|c| *c != '.' && *c != ':').collect();
    let raw: f64 = digits.parse().ok()?;
    let value = (raw * multiplier * 100.0).round() / 100.0;

    Some(NumberParse::Token(NumberToken { prefix, currency, value, suffix }))
}

/// Token-level rewrite: the rendered replacement, or `None` when the token
/// is not numeric.
pub fn rewrite_number(token: &str) -> Option<String> {
    match parse_number(token)? {
        NumberParse::Token(num) => Some(num.render()),
        NumberParse::Range(split) => Some(split),
    }
}

/// One numbers pass over the text (vocabulary-gated, held tokens skipped).
pub fn serialize_numbers(text: &str, tables: &Tables) -> String {
    rewrite_free_tokens(text, |token| {
        if tables.vocabulary.contains(token) {
            return token.to_string();
        }
        rewrite_number(token).unwrap_or_else(|| token.to_string())
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_suffix() {
        assert_eq!(rewrite_number("1.5k").unwrap(), "@NUM[1500.0]");
        assert_eq!(rewrite_number("2m").unwrap(), "@NUM[2000000.0]");
        assert_eq!(rewrite_number("3bn").unwrap(), "@NUM[3000000000.0]");
    }

    #[test]
    fn test_negative_decimal() {
        assert_eq!(rewrite_number("-3.25").unwrap(), "@NUM[-3.25]");
    }

    #[test]
    fn test_thousands_separator_and_currency() {
        assert_eq!(rewrite_number("$1,234").unwrap(), "@NUM[1234.0] dollar");
    }

    #[test]
    fn test_comma_as_decimal() {
        assert_eq!(rewrite_number("0,5").unwrap(), "@NUM[0.5]");
    }

    #[test]
    fn test_percent() {
        assert_eq!(rewrite_number("50%").unwrap(), "@NUM[50.0] percent");
    }

    #[test]
    fn test_prefix_words() {
        assert_eq!(rewrite_number("~100").unwrap(), "around @NUM[100.0]");
        assert_eq!(rewrite_number("#1").unwrap(), "ranked @NUM[1.0]");
        assert_eq!(rewrite_number("=42").unwrap(), "equals @NUM[42.0]");
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(rewrite_number("10x").unwrap(), "@NUM[10.0] times");
    }

    #[test]
    fn test_swapped_sign_and_currency() {
        assert_eq!(rewrite_number("$-5").unwrap(), "@NUM[-5.0] dollar");
    }

    #[test]
    fn test_range_is_split_not_parsed() {
        assert_eq!(parse_number("5-10"), Some(NumberParse::Range("5 10".to_string())));
    }

    #[test]
    fn test_non_numeric_tokens_rejected() {
        assert_eq!(rewrite_number("moon"), None);
        assert_eq!(rewrite_number("@user"), None);
        assert_eq!(rewrite_number("$btc"), None);
    }

    #[test]
    fn test_unknown_suffix_passes_through() {
        assert_eq!(rewrite_number("5th").unwrap(), "@NUM[5.0] th");
    }

    #[test]
    fn test_serialize_numbers_stage() {
        let t = Tables::default();
        let out = serialize_numbers("up 1.5k today", &t);
        assert_eq!(out, "up @NUM[1500.0] today");
        // held tokens survive re-application untouched
        assert_eq!(serialize_numbers(&out, &t), out);
    }

    #[test]
    fn test_vocabulary_gated() {
        let t = Tables::with_vocabulary(["24/7"]);
        assert_eq!(serialize_numbers("always 24/7", &t), "always 24/7");
    }
}
