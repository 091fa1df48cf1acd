//! Structured score explanations.
//!
//! Explanations are a side channel: requesting one never changes the score
//! itself, and every number in the breakdown is the value the formula
//! actually used.

use std::fmt;

/// How one field contributed to the combined statistics of a term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldContribution {
  /// Field name.
  pub field: String,
  /// Weight the parameter table resolved for the field.
  pub weight: f32,
  /// Raw term frequency in the field.
  pub tf: u32,
  /// Raw field length.
  pub field_length: u32,
  /// `weight × tf`, this field's share of the weighted term frequency.
  pub weighted_tf: f32,
  /// `weight × field_length`, this field's share of the weighted length.
  pub weighted_length: f32,
}

/// Every input and intermediate of one combined-field score computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
  /// Inverse document frequency supplied by the caller.
  pub idf: f32,
  /// Weighted term frequency across fields.
  pub weighted_tf: f32,
  /// Weighted document length across fields.
  pub weighted_length: f32,
  /// Collection-wide average weighted document length.
  pub avg_weighted_length: f32,
  /// Effective term-frequency saturation.
  pub k1: f32,
  /// Effective length normalization.
  pub b: f32,
  /// `(1 - b) + b × (weighted_length / avg_weighted_length)`, with the
  /// zero-average guard already applied.
  pub length_norm: f32,
  /// The final score.
  pub score: f32,
}

impl fmt::Display for ScoreBreakdown {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "score {:.4} = idf {:.4} * (wtf {:.2} * (k1 {:.2} + 1)) / (wtf {:.2} + k1 {:.2} * norm {:.4})",
      self.score, self.idf, self.weighted_tf, self.k1, self.weighted_tf, self.k1, self.length_norm
    )?;
    write!(
      f,
      "  norm from b {:.2}, weighted length {:.2}, collection average {:.2}",
      self.b, self.weighted_length, self.avg_weighted_length
    )
  }
}

/// A full derivation: per-field contributions plus the formula breakdown.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreExplanation {
  /// The term the derivation is for.
  pub term: String,
  /// Per-field shares of the combined statistics, in input order.
  pub contributions: Vec<FieldContribution>,
  /// The formula inputs and result.
  pub breakdown: ScoreBreakdown,
}

impl ScoreExplanation {
  /// The explained score.
  pub fn score(&self) -> f32 {
    self.breakdown.score
  }
}

impl fmt::Display for ScoreExplanation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "term `{}`", self.term)?;
    writeln!(f, "{}", self.breakdown)?;
    for c in &self.contributions {
      writeln!(
        f,
        "  field `{}`: weight {:.2}, tf {}, length {} -> wtf {:.2}, wlen {:.2}",
        c.field, c.weight, c.tf, c.field_length, c.weighted_tf, c.weighted_length
      )?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_breakdown_display_carries_all_inputs() {
    let breakdown = ScoreBreakdown {
      idf: 0.6931,
      weighted_tf: 3.0,
      weighted_length: 12.0,
      avg_weighted_length: 12.0,
      k1: 1.2,
      b: 0.75,
      length_norm: 1.0,
      score: 1.0892,
    };

    let text = breakdown.to_string();
    assert!(text.contains("score 1.0892"));
    assert!(text.contains("idf 0.6931"));
    assert!(text.contains("norm 1.0000"));
    assert!(text.contains("collection average 12.00"));
  }

  #[test]
  fn test_explanation_display_lists_fields() {
    let explanation = ScoreExplanation {
      term: "engine".to_string(),
      contributions: vec![FieldContribution {
        field: "title".to_string(),
        weight: 5.0,
        tf: 2,
        field_length: 4,
        weighted_tf: 10.0,
        weighted_length: 20.0,
      }],
      breakdown: ScoreBreakdown {
        idf: 1.0,
        weighted_tf: 10.0,
        weighted_length: 20.0,
        avg_weighted_length: 18.0,
        k1: 1.2,
        b: 0.75,
        length_norm: 1.0833,
        score: 1.55,
      },
    };

    let text = explanation.to_string();
    assert!(text.contains("term `engine`"));
    assert!(text.contains("field `title`"));
    assert!(text.contains("weight 5.00"));
    assert_eq!(explanation.score(), 1.55);
  }
}
