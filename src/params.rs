//! Per-field scoring parameters: weights plus k1/b overrides and defaults.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Weight applied to fields without an explicit entry.
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// Term-frequency saturation used when no k1 override is configured.
pub const DEFAULT_K1: f32 = 1.2;

/// Length normalization used when no b override is configured.
pub const DEFAULT_B: f32 = 0.75;

/// Validated per-field scoring parameters.
///
/// A `FieldParams` table maps field names to a weight and to optional
/// `k1`/`b` overrides, with table-wide defaults covering everything else.
/// Every entry is validated up front; after construction the table is
/// immutable, so a shared reference serves any number of concurrent
/// readers without locking.
///
/// # Examples
///
/// ```rust
/// use fieldrank::params::FieldParams;
///
/// let params = FieldParams::builder()
///     .weight("title", 5.0)
///     .weight("body", 1.0)
///     .b("title", 0.5)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.weight("title"), 5.0);
/// // Unknown fields fall back to the defaults.
/// assert_eq!(params.weight("tags"), 1.0);
/// assert_eq!(params.b("body"), 0.75);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldParams {
    weights: HashMap<String, f32>,
    k1_overrides: HashMap<String, f32>,
    b_overrides: HashMap<String, f32>,
    default_k1: f32,
    default_b: f32,
}

impl Default for FieldParams {
    /// Creates an empty table: every field resolves to the crate defaults.
    fn default() -> Self {
        Self {
            weights: HashMap::new(),
            k1_overrides: HashMap::new(),
            b_overrides: HashMap::new(),
            default_k1: DEFAULT_K1,
            default_b: DEFAULT_B,
        }
    }
}

impl FieldParams {
    /// Create a new params builder.
    pub fn builder() -> FieldParamsBuilder {
        FieldParamsBuilder::default()
    }

    /// Build a table directly from complete maps.
    ///
    /// The maps are moved into the table, so later changes to anything the
    /// caller kept around cannot reach it.
    ///
    /// # Errors
    ///
    /// Every weight must be positive and finite, every k1 non-negative and
    /// finite, and every b within `[0, 1]`; the defaults follow the same
    /// rules as their per-field counterparts. One offending entry anywhere
    /// fails the whole construction with an error naming the parameter kind
    /// and, for per-field entries, the field.
    pub fn new(
        weights: HashMap<String, f32>,
        k1_overrides: HashMap<String, f32>,
        b_overrides: HashMap<String, f32>,
        default_k1: f32,
        default_b: f32,
    ) -> Result<Self, ConfigError> {
        for (field, &value) in &weights {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidWeight {
                    field: field.clone(),
                    value,
                });
            }
        }
        for (field, &value) in &k1_overrides {
            if !valid_k1(value) {
                return Err(ConfigError::InvalidK1 {
                    field: field.clone(),
                    value,
                });
            }
        }
        for (field, &value) in &b_overrides {
            if !valid_b(value) {
                return Err(ConfigError::InvalidB {
                    field: field.clone(),
                    value,
                });
            }
        }
        if !valid_k1(default_k1) {
            return Err(ConfigError::InvalidDefaultK1 { value: default_k1 });
        }
        if !valid_b(default_b) {
            return Err(ConfigError::InvalidDefaultB { value: default_b });
        }

        Ok(Self {
            weights,
            k1_overrides,
            b_overrides,
            default_k1,
            default_b,
        })
    }

    /// Weight for a field, falling back to [`DEFAULT_WEIGHT`].
    pub fn weight(&self, field: &str) -> f32 {
        self.weights.get(field).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// k1 for a field, falling back to the table default.
    pub fn k1(&self, field: &str) -> f32 {
        self.k1_overrides
            .get(field)
            .copied()
            .unwrap_or(self.default_k1)
    }

    /// b for a field, falling back to the table default.
    pub fn b(&self, field: &str) -> f32 {
        self.b_overrides
            .get(field)
            .copied()
            .unwrap_or(self.default_b)
    }

    /// The table-wide k1 default.
    pub fn default_k1(&self) -> f32 {
        self.default_k1
    }

    /// The table-wide b default.
    pub fn default_b(&self) -> f32 {
        self.default_b
    }

    /// Owned copy of the weight map.
    ///
    /// The returned map is detached from the table: inserting into it or
    /// clearing it has no effect on subsequent `weight` lookups.
    pub fn weights(&self) -> HashMap<String, f32> {
        self.weights.clone()
    }

    /// Owned copy of the k1 override map, detached from the table.
    pub fn k1_overrides(&self) -> HashMap<String, f32> {
        self.k1_overrides.clone()
    }

    /// Owned copy of the b override map, detached from the table.
    pub fn b_overrides(&self) -> HashMap<String, f32> {
        self.b_overrides.clone()
    }
}

fn valid_k1(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn valid_b(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Builder for [`FieldParams`].
#[derive(Debug)]
pub struct FieldParamsBuilder {
    weights: HashMap<String, f32>,
    k1_overrides: HashMap<String, f32>,
    b_overrides: HashMap<String, f32>,
    default_k1: f32,
    default_b: f32,
}

impl Default for FieldParamsBuilder {
    fn default() -> Self {
        Self {
            weights: HashMap::new(),
            k1_overrides: HashMap::new(),
            b_overrides: HashMap::new(),
            default_k1: DEFAULT_K1,
            default_b: DEFAULT_B,
        }
    }
}

impl FieldParamsBuilder {
    /// Set the weight for a field.
    pub fn weight(mut self, field: impl Into<String>, weight: f32) -> Self {
        self.weights.insert(field.into(), weight);
        self
    }

    /// Set a k1 override for a field.
    pub fn k1(mut self, field: impl Into<String>, k1: f32) -> Self {
        self.k1_overrides.insert(field.into(), k1);
        self
    }

    /// Set a b override for a field.
    pub fn b(mut self, field: impl Into<String>, b: f32) -> Self {
        self.b_overrides.insert(field.into(), b);
        self
    }

    /// Set the table-wide k1 default.
    pub fn default_k1(mut self, k1: f32) -> Self {
        self.default_k1 = k1;
        self
    }

    /// Set the table-wide b default.
    pub fn default_b(mut self, b: f32) -> Self {
        self.default_b = b;
        self
    }

    /// Validate every entry and build the table.
    pub fn build(self) -> Result<FieldParams, ConfigError> {
        FieldParams::new(
            self.weights,
            self.k1_overrides,
            self.b_overrides,
            self.default_k1,
            self.default_b,
        )
    }
}
