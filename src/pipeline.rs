//! The full normalization pipeline: stage ordering, fixed-point
//! reconciliation, and batch processing with per-record fault isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::charnorm::normalize_chars;
use crate::entities::{
    apply_synonyms, collapse_dup_chars, convert_leetspeak, disambiguate_entities,
    extract_entities, hashtag_currency_union, singularize_plurals,
};
use crate::langid::{LanguageDetector, LanguageFilter, Whatlang};
use crate::numbers::serialize_numbers;
use crate::placeholder::{rewrite_tokens, Placeholder, PlaceholderKind, GENERIC_TAG};
use crate::structure::{
    break_long_words, collapse_spam_repeats, convert_backslashes, convert_urls,
    convert_urls_widened, drop_shortener_artifacts, expand_contractions, isolate_brackets,
    isolate_emoji, isolate_symbols, join_dashes, normalize_pictograms, normalize_repeated_punct,
    remove_spam_underscores, resolve_acronyms, split_end_punct, split_short_slashes,
    strip_anchor_attrs, strip_html_tags, strip_possessives, trim_underscores,
    unescape_html_entities,
};
use crate::tables::Tables;

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// One raw tweet going into the pipeline.
#[derive(Debug, Clone)]
pub struct TextRecord {
    pub id: u64,
    pub raw_text: String,
    /// Source timestamp (unix seconds), carried through untouched.
    pub created_at: Option<i64>,
}

impl TextRecord {
    pub fn new(id: u64, raw_text: impl Into<String>) -> Self {
        TextRecord { id, raw_text: raw_text.into(), created_at: None }
    }
}

/// One normalized tweet coming out of the pipeline. `kept` is false for
/// records dropped by the language filter or failed during normalization;
/// they stay in the output so batches keep their cardinality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: u64,
    pub normalized_text: String,
    pub kept: bool,
}

/// Iteration counts for the stages that run to a fixed point.
#[derive(Debug, Clone, Copy)]
pub struct StageSchedule {
    /// Long-word splitting passes.
    pub long_word_passes: usize,
    /// Numeric serialization passes.
    pub number_passes: usize,
    /// Full numbers/synonyms/entities reconciliation rounds.
    pub reconcile_passes: usize,
}

impl Default for StageSchedule {
    fn default() -> Self {
        StageSchedule { long_word_passes: 3, number_passes: 4, reconcile_passes: 3 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline
// ─────────────────────────────────────────────────────────────────────────────

pub struct Pipeline {
    tables: Tables,
    schedule: StageSchedule,
    filter: LanguageFilter,
    detector: Box<dyn LanguageDetector + Send + Sync>,
}

impl Pipeline {
    pub fn new(tables: Tables) -> Self {
        Pipeline {
            tables,
            schedule: StageSchedule::default(),
            filter: LanguageFilter::default(),
            detector: Box::new(Whatlang::default()),
        }
    }

    pub fn with_schedule(mut self, schedule: StageSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_language_filter(mut self, filter: LanguageFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector + Send + Sync>) -> Self {
        self.detector = detector;
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Run numbers, synonyms, and entity extraction to a fixed point.
    ///
    /// Earlier stages keep uncovering new extractable material (a split
    /// token exposes a number, an opened placeholder exposes a mention), so
    /// the extraction trio reruns after each structural stage until the
    /// text stops changing or the round budget runs out.
    fn reconcile(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..self.schedule.reconcile_passes {
            let mut next = serialize_numbers(&current, &self.tables);
            next = apply_synonyms(&next, &self.tables);
            next = extract_entities(&next);
            let mut one = [next];
            hashtag_currency_union(&mut one);
            let [next] = one;
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Normalize one text through every stage except the batch-level
    /// placeholder union and the language filter.
    pub fn normalize_text(&self, text: &str) -> String {
        let t = &self.tables;

        // character level
        let mut out = normalize_chars(text, t);

        // markup and urls
        out = strip_anchor_attrs(&out);
        out = convert_urls(&out);
        out = drop_shortener_artifacts(&out);
        out = unescape_html_entities(&out);
        out = strip_html_tags(&out, t);
        out = convert_urls_widened(&out, t);

        // pictograms, emoji, and spam shapes
        out = normalize_pictograms(&out, t, false);
        out = isolate_emoji(&out, t);
        out = normalize_repeated_punct(&out, t);
        out = remove_spam_underscores(&out, t);
        out = collapse_spam_repeats(&out, t);
        out = normalize_pictograms(&out, t, true);

        // token structure
        out = isolate_brackets(&out);
        out = split_short_slashes(&out);
        for _ in 0..self.schedule.long_word_passes {
            let next = break_long_words(&out);
            if next == out {
                break;
            }
            out = next;
        }

        // first extraction round
        out = disambiguate_entities(&out, t);
        out = apply_synonyms(&out, t);
        out = extract_entities(&out);
        let mut one = [out];
        hashtag_currency_union(&mut one);
        let [mut out] = one;

        out = trim_underscores(&out, t);
        out = split_end_punct(&out);
        for _ in 0..self.schedule.number_passes {
            let next = serialize_numbers(&out, t);
            if next == out {
                break;
            }
            out = next;
        }
        out = self.reconcile(&out);

        // word-level repairs, re-reconciling after each group
        out = resolve_acronyms(&out, t);
        out = expand_contractions(&out, t);
        out = strip_possessives(&out, t);
        out = convert_backslashes(&out, t);
        out = self.reconcile(&out);

        out = collapse_dup_chars(&out, t);
        out = self.reconcile(&out);

        out = join_dashes(&out, t);
        out = isolate_symbols(&out, t);
        out = convert_leetspeak(&out, t);
        out = self.reconcile(&out);

        // open generic holds, then the final vocabulary passes
        out = open_generic_holds(&out);
        out = singularize_plurals(&out, t);
        self.reconcile(&out)
    }

    /// Normalize a batch: per-record cleaning with fault isolation, a
    /// batch-wide currency/hashtag union, then the language filter.
    pub fn process_batch(&self, records: &[TextRecord]) -> Vec<NormalizedRecord> {
        debug!(records = records.len(), "normalizing batch");

        let mut cleaned: Vec<Option<String>> = Vec::with_capacity(records.len());
        for record in records {
            let result = catch_unwind(AssertUnwindSafe(|| self.normalize_text(&record.raw_text)));
            match result {
                Ok(text) => cleaned.push(Some(text)),
                Err(_) => {
                    warn!(id = record.id, "normalization failed, excluding record");
                    cleaned.push(None);
                }
            }
        }

        // currency identity wins across the whole batch
        let mut pool: Vec<String> = cleaned.iter().flatten().cloned().collect();
        hashtag_currency_union(&mut pool);
        let mut pooled = pool.into_iter();
        for slot in cleaned.iter_mut() {
            if slot.is_some() {
                *slot = pooled.next();
            }
        }

        records
            .iter()
            .zip(cleaned)
            .map(|(record, text)| match text {
                Some(text) => {
                    let kept = self.filter.keeps(self.detector.as_ref(), &text);
                    NormalizedRecord { id: record.id, normalized_text: text, kept }
                }
                None => NormalizedRecord {
                    id: record.id,
                    normalized_text: record.raw_text.clone(),
                    kept: false,
                },
            })
            .collect()
    }
}

/// Replace generic `word_placeholder[..]` tokens with their original
/// payload so the final vocabulary passes can see the words again. Typed
/// placeholders stay sealed.
fn open_generic_holds(text: &str) -> String {
    rewrite_tokens(text, |token| {
        if !token.starts_with(GENERIC_TAG) {
            return token.to_string();
        }
        match Placeholder::parse(token) {
            Some(p) if p.kind == PlaceholderKind::Generic => p.unescaped_payload(),
            _ => token.to_string(),
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::hold;

    struct Fixed(f64);

    impl LanguageDetector for Fixed {
        fn target_confidence(&self, _text: &str) -> f64 {
            self.0
        }
    }

    fn english_pipeline() -> Pipeline {
        Pipeline::new(Tables::default()).with_detector(Box::new(Fixed(1.0)))
    }

    #[test]
    fn test_end_to_end_tweet() {
        let pipeline = english_pipeline();
        let out = pipeline.normalize_text(
            "Check this out!!! http://example.com/foo $btc is UP 1.5k!! #tothemoon @user123",
        );
        assert!(out.contains("@URL[example.com]"), "got: {}", out);
        assert!(out.contains("@CURR[btc]"), "got: {}", out);
        assert!(out.contains("@NUM[1500.0]"), "got: {}", out);
        assert!(out.contains("@HTAG[tothemoon]"), "got: {}", out);
        assert!(out.contains("@USR[user123]"), "got: {}", out);
        assert!(out.contains("! ! !"), "got: {}", out);
        assert!(out.contains("check this out"), "got: {}", out);
    }

    #[test]
    fn test_normalization_is_stable() {
        let pipeline = english_pipeline();
        let once = pipeline.normalize_text("BTC hit $45,000 today!!! @whale is selling #crypto");
        let twice = pipeline.normalize_text(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reconcile_reaches_fixed_point() {
        let pipeline = english_pipeline();
        let stable = pipeline.reconcile("@CURR[btc] at @NUM[45000.0] dollar today");
        assert_eq!(pipeline.reconcile(&stable), stable);
    }

    #[test]
    fn test_batch_union_crosses_records() {
        let pipeline = english_pipeline();
        let records = vec![
            TextRecord::new(1, "$btc pumping hard right now"),
            TextRecord::new(2, "#btc mentioned everywhere today"),
        ];
        let out = pipeline.process_batch(&records);
        assert!(out[0].normalized_text.contains("@CURR[btc]"), "got: {}", out[0].normalized_text);
        assert!(out[1].normalized_text.contains("@CURR[btc]"), "got: {}", out[1].normalized_text);
    }

    #[test]
    fn test_language_filter_marks_dropped_records() {
        let pipeline = Pipeline::new(Tables::default()).with_detector(Box::new(Fixed(0.0)));
        let records = vec![TextRecord::new(7, "der markt sieht heute wieder sehr stark aus")];
        let out = pipeline.process_batch(&records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 7);
        assert!(!out[0].kept);
    }

    #[test]
    fn test_batch_keeps_cardinality_and_order() {
        let pipeline = english_pipeline();
        let records = vec![
            TextRecord::new(10, "first tweet about the market"),
            TextRecord::new(11, "second tweet about the market"),
        ];
        let out = pipeline.process_batch(&records);
        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn test_open_generic_holds() {
        let held = hold(PlaceholderKind::Generic, "two words");
        let text = format!("before {held} after");
        assert_eq!(open_generic_holds(&text), "before two words after");
        // typed placeholders stay sealed
        assert_eq!(open_generic_holds("@CURR[btc] up"), "@CURR[btc] up");
    }

    #[test]
    fn test_vocabulary_words_pass_untouched() {
        // "1k" in the vocabulary skips numeric serialization
        let gated = Pipeline::new(Tables::with_vocabulary(["1k"]))
            .with_detector(Box::new(Fixed(1.0)));
        let out = gated.normalize_text("up 1k today");
        assert!(out.contains("1k"), "got: {}", out);

        let open = english_pipeline();
        let out = open.normalize_text("up 1k today");
        assert!(out.contains("@NUM[1000.0]"), "got: {}", out);
    }
}
