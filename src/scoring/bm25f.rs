//! The combined-field BM25 saturation formula.
//!
//! BM25F folds several weighted fields into one virtual field before
//! applying the usual BM25 shape: term frequencies and lengths are combined
//! first (see [`crate::scoring::combine`]), then a single saturation and
//! length normalization runs over the combined scalars.

use std::collections::HashMap;

use tracing::error;

use crate::error::ConfigError;
use crate::params::{FieldParams, DEFAULT_B, DEFAULT_K1};
use crate::scoring::combine::CombinedStats;
use crate::scoring::explain::ScoreBreakdown;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scores combined-field statistics with one effective `k1`/`b` pair.
///
/// BM25F applies a single saturation to the combined virtual field, so one
/// scorer carries exactly one `k1` and one `b` per scoring event. Per-field
/// overrides from a [`FieldParams`] table never blend into a combined
/// computation; they surface through [`Bm25fScorer::for_field`] for
/// introspection and for scoring a clause against one field in isolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25fScorer {
  /// Term-frequency saturation. Higher values let repeated occurrences
  /// keep raising the score longer; 0 disables saturation entirely.
  pub k1: f32,
  /// Length normalization in `[0, 1]`. 0 ignores document length, 1
  /// applies the full penalty for longer-than-average documents.
  pub b: f32,
}

impl Default for Bm25fScorer {
  /// Creates a scorer with the crate-default `k1` and `b`.
  fn default() -> Self {
    Self {
      k1: DEFAULT_K1,
      b: DEFAULT_B,
    }
  }
}

impl Bm25fScorer {
  /// Creates a scorer from explicit parameters.
  ///
  /// # Errors
  ///
  /// `k1` must be non-negative and finite, `b` within `[0, 1]`.
  pub fn new(k1: f32, b: f32) -> Result<Self, ConfigError> {
    if !k1.is_finite() || k1 < 0.0 {
      return Err(ConfigError::InvalidDefaultK1 { value: k1 });
    }
    if !(0.0..=1.0).contains(&b) {
      return Err(ConfigError::InvalidDefaultB { value: b });
    }
    Ok(Self { k1, b })
  }

  /// Creates a scorer from a parameter table's defaults.
  ///
  /// This is the scorer used for combined-field term scoring; the table is
  /// already validated, so this never fails.
  pub fn from_params(params: &FieldParams) -> Self {
    Self {
      k1: params.default_k1(),
      b: params.default_b(),
    }
  }

  /// Creates a scorer from one field's resolved `k1`/`b`.
  ///
  /// Used when a clause is scored against a single field (phrase, fuzzy,
  /// wildcard and range clauses take this path) and when explaining what
  /// parameters a field resolves to. Unknown fields resolve to the table
  /// defaults.
  pub fn for_field(params: &FieldParams, field: &str) -> Self {
    Self {
      k1: params.k1(field),
      b: params.b(field),
    }
  }

  /// Scores one term's combined statistics for one document.
  ///
  /// ```text
  /// norm  = (1 - b) + b * (weighted_length / avg_weighted_length)
  /// score = idf * (weighted_tf * (k1 + 1)) / (weighted_tf + k1 * norm)
  /// ```
  ///
  /// Edge cases are defined values, not errors: a zero `weighted_tf`
  /// scores 0, a zero `k1` yields exactly `idf`, and a zero `b` or zero
  /// `avg_weighted_length` pins the length norm at 1.
  ///
  /// # Arguments
  ///
  /// * `idf` - Inverse document frequency of the term, see [`idf`].
  /// * `stats` - Combined statistics from [`crate::scoring::combine_fields`].
  /// * `avg_weighted_length` - Collection-wide average weighted document
  ///   length, see [`average_weighted_length`].
  ///
  /// # Returns
  ///
  /// A finite, non-negative score. If a non-finite input sneaks through
  /// and the computation produces NaN, the score is clamped to 0 and the
  /// offending inputs are logged rather than poisoning the result set.
  pub fn score(&self, idf: f32, stats: CombinedStats, avg_weighted_length: f32) -> f32 {
    if stats.weighted_tf <= 0.0 {
      return 0.0;
    }
    if self.k1 == 0.0 {
      // Algebraic limit: saturation disappears and the score is the idf.
      return idf;
    }

    let norm = self.length_norm(stats.weighted_length, avg_weighted_length);
    let score =
      idf * (stats.weighted_tf * (self.k1 + 1.0)) / (stats.weighted_tf + self.k1 * norm);

    if score.is_nan() {
      error!(
        ?idf,
        weighted_tf = stats.weighted_tf,
        weighted_length = stats.weighted_length,
        ?avg_weighted_length,
        k1 = self.k1,
        b = self.b,
        "combined-field score is NaN, clamping to 0"
      );
      return 0.0;
    }

    score
  }

  /// Scores and returns the full formula breakdown.
  ///
  /// The breakdown carries every input and the intermediate length norm,
  /// enough for a human-readable derivation; the score inside equals what
  /// [`Bm25fScorer::score`] returns for the same inputs.
  pub fn explain(
    &self,
    idf: f32,
    stats: CombinedStats,
    avg_weighted_length: f32,
  ) -> ScoreBreakdown {
    ScoreBreakdown {
      idf,
      weighted_tf: stats.weighted_tf,
      weighted_length: stats.weighted_length,
      avg_weighted_length,
      k1: self.k1,
      b: self.b,
      length_norm: self.length_norm(stats.weighted_length, avg_weighted_length),
      score: self.score(idf, stats, avg_weighted_length),
    }
  }

  /// Scores a batch of combined statistics against one term.
  #[cfg(feature = "parallel")]
  pub fn score_batch(
    &self,
    stats: &[CombinedStats],
    idf: f32,
    avg_weighted_length: f32,
  ) -> Vec<f32> {
    stats
      .par_iter()
      .map(|s| self.score(idf, *s, avg_weighted_length))
      .collect()
  }

  /// Scores a batch of combined statistics against one term.
  #[cfg(not(feature = "parallel"))]
  pub fn score_batch(
    &self,
    stats: &[CombinedStats],
    idf: f32,
    avg_weighted_length: f32,
  ) -> Vec<f32> {
    stats
      .iter()
      .map(|s| self.score(idf, *s, avg_weighted_length))
      .collect()
  }

  fn length_norm(&self, weighted_length: f32, avg_weighted_length: f32) -> f32 {
    if avg_weighted_length <= 0.0 {
      return 1.0;
    }
    (1.0 - self.b) + self.b * (weighted_length / avg_weighted_length)
  }
}

/// Inverse document frequency of a term.
///
/// `ln(1 + (doc_count - doc_freq + 0.5) / (doc_freq + 0.5))`, the Lucene
/// variant: strictly positive even for a term present in every document.
pub fn idf(doc_freq: u64, doc_count: u64) -> f32 {
  // doc_freq can never legitimately exceed doc_count.
  let doc_freq = doc_freq.min(doc_count);
  let x = ((doc_count - doc_freq) as f32 + 0.5) / (doc_freq as f32 + 0.5);
  (1.0 + x).ln()
}

/// Collection-wide average weighted document length.
///
/// Takes the per-field sum of field lengths over the whole collection and
/// weights each sum like the aggregator weights individual documents:
/// `Σ weight(field) × sum_field_length(field) / doc_count`. Returns 0 for
/// an empty collection, which the scorer treats as "no normalization".
pub fn average_weighted_length(
  field_length_sums: &HashMap<String, u64>,
  doc_count: u64,
  params: &FieldParams,
) -> f32 {
  if doc_count == 0 {
    return 0.0;
  }

  let total: f32 = field_length_sums
    .iter()
    .map(|(field, &sum)| params.weight(field) * sum as f32)
    .sum();

  total / doc_count as f32
}
