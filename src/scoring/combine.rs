//! Aggregation of per-field statistics into combined-field scalars.

use crate::params::FieldParams;
use crate::scoring::explain::FieldContribution;

/// One field's statistics for a single term in a single document.
///
/// The external index supplies one occurrence per configured field. A field
/// the term never appears in should still be passed with `tf` 0 and its
/// real `field_length`, so that length normalization sees the whole
/// document rather than just the matching fields. Fields absent from the
/// document entirely may be omitted or passed as all zeroes; both
/// contribute nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOccurrence<'a> {
  /// Name of the field, resolved against the parameter table.
  pub field: &'a str,
  /// Term frequency within the field.
  pub tf: u32,
  /// Total number of terms in the field.
  pub field_length: u32,
}

impl<'a> FieldOccurrence<'a> {
  /// Creates an occurrence record for one field.
  pub fn new(field: &'a str, tf: u32, field_length: u32) -> Self {
    Self {
      field,
      tf,
      field_length,
    }
  }
}

/// The two scalars the combined-field formula consumes.
///
/// `weighted_tf` is the weighted term frequency over all supplied fields
/// and `weighted_length` the weighted document length. Both live only for
/// the duration of one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombinedStats {
  /// `Σ weight(field) × tf(field)` over the supplied occurrences.
  pub weighted_tf: f32,
  /// `Σ weight(field) × field_length(field)` over the supplied occurrences.
  pub weighted_length: f32,
}

/// Collapses per-field `(tf, field_length)` statistics into combined-field
/// scalars using the weights from `params`.
///
/// Pure function: the input slice is read once and never mutated. Fields
/// without a configured weight count with [`crate::params::DEFAULT_WEIGHT`].
pub fn combine_fields(occurrences: &[FieldOccurrence<'_>], params: &FieldParams) -> CombinedStats {
  let mut stats = CombinedStats::default();

  for occ in occurrences {
    let weight = params.weight(occ.field);
    stats.weighted_tf += weight * occ.tf as f32;
    stats.weighted_length += weight * occ.field_length as f32;
  }

  stats
}

/// Like [`combine_fields`], additionally recording how much each field
/// contributed to the two sums. The contribution records come back in
/// input order, ready to embed in a score explanation.
pub fn combine_fields_explained(
  occurrences: &[FieldOccurrence<'_>],
  params: &FieldParams,
) -> (CombinedStats, Vec<FieldContribution>) {
  let mut stats = CombinedStats::default();
  let mut contributions = Vec::with_capacity(occurrences.len());

  for occ in occurrences {
    let weight = params.weight(occ.field);
    let weighted_tf = weight * occ.tf as f32;
    let weighted_length = weight * occ.field_length as f32;

    stats.weighted_tf += weighted_tf;
    stats.weighted_length += weighted_length;

    contributions.push(FieldContribution {
      field: occ.field.to_string(),
      weight,
      tf: occ.tf,
      field_length: occ.field_length,
      weighted_tf,
      weighted_length,
    });
  }

  (stats, contributions)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params() -> FieldParams {
    FieldParams::builder()
      .weight("title", 5.0)
      .weight("body", 1.0)
      .build()
      .unwrap()
  }

  #[test]
  fn test_combines_weighted_sums() {
    let occurrences = [
      FieldOccurrence::new("title", 2, 4),
      FieldOccurrence::new("body", 3, 100),
    ];

    let stats = combine_fields(&occurrences, &params());
    assert_eq!(stats.weighted_tf, 5.0 * 2.0 + 3.0);
    assert_eq!(stats.weighted_length, 5.0 * 4.0 + 100.0);
  }

  #[test]
  fn test_empty_input_is_all_zero() {
    let stats = combine_fields(&[], &params());
    assert_eq!(stats, CombinedStats::default());
  }

  #[test]
  fn test_zero_tf_still_contributes_length() {
    let occurrences = [FieldOccurrence::new("title", 0, 8)];

    let stats = combine_fields(&occurrences, &params());
    assert_eq!(stats.weighted_tf, 0.0);
    assert_eq!(stats.weighted_length, 40.0);
  }

  #[test]
  fn test_unconfigured_field_uses_default_weight() {
    let occurrences = [FieldOccurrence::new("tags", 2, 6)];

    let stats = combine_fields(&occurrences, &params());
    assert_eq!(stats.weighted_tf, 2.0);
    assert_eq!(stats.weighted_length, 6.0);
  }

  #[test]
  fn test_explained_matches_plain_aggregation() {
    let occurrences = [
      FieldOccurrence::new("title", 1, 4),
      FieldOccurrence::new("body", 0, 50),
    ];
    let params = params();

    let plain = combine_fields(&occurrences, &params);
    let (stats, contributions) = combine_fields_explained(&occurrences, &params);

    assert_eq!(stats, plain);
    assert_eq!(contributions.len(), 2);
    assert_eq!(contributions[0].field, "title");
    assert_eq!(contributions[0].weighted_tf, 5.0);
    assert_eq!(contributions[1].field, "body");
    assert_eq!(contributions[1].weighted_tf, 0.0);
    assert_eq!(contributions[1].weighted_length, 50.0);
  }
}
