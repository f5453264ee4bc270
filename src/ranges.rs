//! Feature Range Validation
//!
//! Holds the per-feature min/max bounds produced by the offline training job
//! (empirical min/max of the historical dataset) and rejects prediction
//! inputs that fall outside them. The table is loaded once at startup and
//! shared read-only.

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::OutOfRangeError;

/// Inclusive bounds for a single feature.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Per-feature bounds table keyed by feature name.
///
/// Features not present in the table are accepted without checking; the
/// offline job decides which features carry bounds.
#[derive(Debug, Clone)]
pub struct FeatureRanges {
    ranges: FxHashMap<String, Bounds>,
}

impl FeatureRanges {
    /// Load the bounds table from a `feature_ranges.json` artifact.
    ///
    /// Every entry must satisfy `min <= max`; a violation means the artifact
    /// is corrupt and the service must not start.
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature ranges: {}", path))?;
        let ranges: FxHashMap<String, Bounds> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse feature ranges: {}", path))?;

        Self::from_table(ranges)
    }

    /// Build directly from a bounds table, enforcing the min/max invariant.
    pub fn from_table(ranges: FxHashMap<String, Bounds>) -> Result<Self> {
        for (feature, bounds) in &ranges {
            if bounds.min > bounds.max {
                bail!(
                    "Invalid range for {}: min {} exceeds max {}",
                    feature,
                    bounds.min,
                    bounds.max
                );
            }
        }
        Ok(Self { ranges })
    }

    /// Number of bounded features.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Check every `(feature, value)` pair in the caller's order.
    ///
    /// Fails on the first value strictly outside its bounds; later
    /// violations are not collected. Unknown features pass.
    pub fn validate(&self, features: &[(&str, f64)]) -> Result<(), OutOfRangeError> {
        for &(feature, value) in features {
            if let Some(bounds) = self.ranges.get(feature) {
                if value < bounds.min || value > bounds.max {
                    return Err(OutOfRangeError {
                        feature: feature.to_string(),
                        value,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
        }
        Ok(())
    }
}
