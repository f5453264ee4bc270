//! Crop Advisor Service
//!
//! Agricultural-advisory HTTP service: recommends crops from soil/weather
//! measurements via a pre-trained classifier artifact, and answers free-text
//! farming questions via keyword matching against a curated QA corpus.
//!
//! - `ranges`: input validation against learned per-feature bounds
//! - `classifier`: scaler + tree-ensemble artifact, top-3 crop ranking
//! - `qa/`: text normalization, corpus loading, keyword matching
//! - `advice`: weather-threshold advisory sentences
//! - `api_server`: Axum routes, handlers, application state

pub mod advice;
pub mod api_server;
pub mod classifier;
pub mod error;
pub mod qa;
pub mod ranges;

// Re-export commonly used types
pub use advice::{climate_advice, WeatherReading};
pub use api_server::{create_router, AppState};
pub use classifier::{CropClassifier, Recommendation};
pub use error::{InferenceError, OutOfRangeError};
pub use qa::QaCorpus;
pub use ranges::FeatureRanges;
