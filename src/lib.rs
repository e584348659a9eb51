//! # tweetnorm
//!
//! Text normalization for tweet corpora, preparing raw social-media text
//! for a language model's subword tokenizer. Roughly forty cleaning
//! stages run in fixed order: Unicode canonicalization, HTML/URL removal,
//! entity extraction into typed placeholders, numeric serialization with
//! scale and currency inference, vocabulary-aware token repair, and a
//! final language filter.
//!
//! ## Quick start
//!
//! ```
//! use tweetnorm::{Pipeline, Tables, TextRecord};
//!
//! let pipeline = Pipeline::new(Tables::default());
//!
//! // One-off text normalization
//! let out = pipeline.normalize_text("$btc is UP 1.5k!! #tothemoon @user123");
//! assert!(out.contains("@CURR[btc]"));
//! assert!(out.contains("@NUM[1500.0]"));
//!
//! // Batch processing with language filtering and cross-record
//! // placeholder reconciliation
//! let records = vec![
//!     TextRecord::new(1, "Check this https://example.com/thread out!!!"),
//!     TextRecord::new(2, "#btc breaking out, $btc to the moon"),
//! ];
//! let normalized = pipeline.process_batch(&records);
//! assert_eq!(normalized.len(), records.len());
//! ```
//!
//! Reference tables (vocabulary, TLD list, contraction and synonym
//! dictionaries) load from JSON via [`Tables::from_json`]; every table has
//! a built-in default so an empty spec still produces a working pipeline.
//!
//! ## Pipeline (per record)
//! 1. **Character normalization** — NFKC-style folding, de-accenting,
//!    control character removal, unknown-symbol transliteration.
//! 2. **Structural cleaning** — HTML entities and tags, URL detection
//!    (domain extracted into a `@URL[..]` placeholder), spam shape
//!    collapsing, long-token breaking.
//! 3. **Entity extraction** — mentions, hashtags, cashtags, and numbers
//!    become typed placeholders (`@USR` `@HTAG` `@CURR` `@NUM`).
//! 4. **Reconciliation** — extraction reruns to a bounded fixed point as
//!    token repairs (leetspeak, duplicate chars, plurals) expose new
//!    material.
//! 5. **Language filter** — non-target-language records are marked
//!    `kept: false`, preserving batch cardinality.

pub mod charnorm;
pub mod entities;
pub mod langid;
pub mod numbers;
pub mod pipeline;
pub mod placeholder;
pub mod structure;
pub mod tables;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use langid::{LanguageDetector, LanguageFilter, Whatlang};
pub use pipeline::{NormalizedRecord, Pipeline, StageSchedule, TextRecord};
pub use placeholder::{Placeholder, PlaceholderKind};
pub use tables::{Tables, TablesSpec, Vocabulary};
