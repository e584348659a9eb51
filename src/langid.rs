//! Language filtering for the cleaned corpus.
//!
//! Detection runs on the text with `@`-prefixed tokens removed, so mentions
//! and placeholder markers never sway the classifier. Texts too short to
//! classify are always kept.

use whatlang::Lang;

/// Anything that can score a text's membership in the target language.
///
/// Implemented by [`Whatlang`] for production use; tests inject fixed-score
/// detectors to keep assertions deterministic.
pub trait LanguageDetector {
    /// Confidence in `[0, 1]` that `text` is in the target language.
    fn target_confidence(&self, text: &str) -> f64;
}

/// Statistical trigram detection via the `whatlang` crate.
#[derive(Debug, Clone, Copy)]
pub struct Whatlang {
    target: Lang,
}

impl Whatlang {
    pub fn new(target: Lang) -> Self {
        Whatlang { target }
    }
}

impl Default for Whatlang {
    fn default() -> Self {
        Whatlang::new(Lang::Eng)
    }
}

impl LanguageDetector for Whatlang {
    fn target_confidence(&self, text: &str) -> f64 {
        match whatlang::detect(text) {
            Some(info) if info.lang() == self.target => info.confidence(),
            _ => 0.0,
        }
    }
}

/// Keep/drop decision for one text.
pub struct LanguageFilter {
    pub min_confidence: f64,
}

impl Default for LanguageFilter {
    fn default() -> Self {
        LanguageFilter { min_confidence: 0.2 }
    }
}

impl LanguageFilter {
    /// True when the text should stay in the corpus.
    pub fn keeps(&self, detector: &dyn LanguageDetector, text: &str) -> bool {
        let scored: String = text
            .split_whitespace()
            .filter(|w| !w.starts_with('@'))
            .collect::<Vec<_>>()
            .join(" ");
        if scored.chars().count() < 3 {
            return true;
        }
        detector.target_confidence(&scored) > self.min_confidence
    }
}
