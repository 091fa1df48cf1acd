//! BM25F scoring: field aggregation, the saturation formula, explanations.
//!
//! The pieces compose in one direction: [`combine_fields`] turns per-field
//! `(tf, field_length)` statistics into [`CombinedStats`], and a
//! [`Bm25fScorer`] turns those plus collection-level statistics into a
//! score. [`score_term`] and [`explain_term`] bundle both steps for callers
//! that hold raw per-field statistics.
//!
//! # Example
//!
//! ```rust
//! use fieldrank::params::FieldParams;
//! use fieldrank::scoring::{idf, score_term, FieldOccurrence};
//!
//! let params = FieldParams::builder()
//!     .weight("title", 5.0)
//!     .weight("body", 1.0)
//!     .build()
//!     .unwrap();
//!
//! let occurrences = [
//!     FieldOccurrence::new("title", 1, 4),
//!     FieldOccurrence::new("body", 2, 120),
//! ];
//!
//! let score = score_term(&occurrences, idf(3, 50), 140.0, &params);
//! assert!(score > 0.0);
//! ```

/// Implements the combined-field saturation formula.
pub mod bm25f;
/// Aggregates per-field statistics into combined-field scalars.
pub mod combine;
/// Structured score explanations.
pub mod explain;

pub use bm25f::{average_weighted_length, idf, Bm25fScorer};
pub use combine::{combine_fields, combine_fields_explained, CombinedStats, FieldOccurrence};
pub use explain::{FieldContribution, ScoreBreakdown, ScoreExplanation};

use crate::params::FieldParams;

/// Scores one term against one document from raw per-field statistics.
///
/// Aggregates the occurrences with the table's weights, then applies the
/// combined-field formula using the table's default `k1`/`b`.
pub fn score_term(
  occurrences: &[FieldOccurrence<'_>],
  idf: f32,
  avg_weighted_length: f32,
  params: &FieldParams,
) -> f32 {
  let stats = combine_fields(occurrences, params);
  Bm25fScorer::from_params(params).score(idf, stats, avg_weighted_length)
}

/// Like [`score_term`], returning the full per-field derivation instead of
/// just the scalar.
pub fn explain_term(
  term: &str,
  occurrences: &[FieldOccurrence<'_>],
  idf: f32,
  avg_weighted_length: f32,
  params: &FieldParams,
) -> ScoreExplanation {
  let (stats, contributions) = combine_fields_explained(occurrences, params);
  let breakdown = Bm25fScorer::from_params(params).explain(idf, stats, avg_weighted_length);

  ScoreExplanation {
    term: term.to_string(),
    contributions,
    breakdown,
  }
}
