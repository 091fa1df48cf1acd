//! Error types surfaced while building scoring configuration.

use thiserror::Error;

/// Errors raised when constructing a `FieldParams` table or parsing a
/// default-operator setting.
///
/// Every variant is surfaced synchronously at construction time. A failed
/// build leaves nothing behind: either the whole configuration is accepted
/// or none of it is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  /// A field weight was zero, negative, infinite, or NaN.
  #[error("invalid weight {value} for field `{field}` (weights must be positive and finite)")]
  InvalidWeight { field: String, value: f32 },

  /// A per-field k1 override was negative, infinite, or NaN.
  #[error("invalid k1 {value} for field `{field}` (k1 must be non-negative and finite)")]
  InvalidK1 { field: String, value: f32 },

  /// The default k1 was negative, infinite, or NaN.
  #[error("invalid default k1 {value} (k1 must be non-negative and finite)")]
  InvalidDefaultK1 { value: f32 },

  /// A per-field b override fell outside `[0, 1]` or was NaN.
  #[error("invalid b {value} for field `{field}` (b must lie within [0, 1])")]
  InvalidB { field: String, value: f32 },

  /// The default b fell outside `[0, 1]` or was NaN.
  #[error("invalid default b {value} (b must lie within [0, 1])")]
  InvalidDefaultB { value: f32 },

  /// A default-operator string was not one of the recognized spellings.
  #[error("unrecognized default operator `{0}` (expected `or`, `should`, `and` or `must`)")]
  InvalidOperator(String),
}
