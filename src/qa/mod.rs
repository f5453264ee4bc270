//! Question Answering
//!
//! Keyword-match responder over a static, ordered QA corpus:
//! - `normalize`: lowercase/tokenize/base-form reduction of free text
//! - `corpus`: corpus loading and invariants
//! - `matcher`: scoring scan, tie-break, fallback, weather augmentation

pub mod corpus;
pub mod matcher;
pub mod normalize;

pub use corpus::{QaCorpus, QaEntry};
