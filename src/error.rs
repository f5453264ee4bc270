//! Request-level error types
//!
//! Startup failures (missing or corrupt artifacts) are reported through
//! `anyhow` with context chains in the loaders and abort the process before
//! the listener binds. The types here cover the two failure modes a live
//! request can hit: an input feature outside its learned bounds, and an
//! unexpected numeric failure inside the classifier.

use thiserror::Error;

/// A feature value fell outside the bounds learned from the training data.
///
/// The message format matches what clients of the original service parsed:
/// feature name, offending value, and the valid interval.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{feature} value {value} is outside the valid range [{min}, {max}]")]
pub struct OutOfRangeError {
    pub feature: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Inference produced a non-finite result.
///
/// Not expected for validated input; surfaced as an internal error rather
/// than a panic.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("inference failed: {0}")]
pub struct InferenceError(pub String);
