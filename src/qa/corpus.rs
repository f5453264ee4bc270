//! QA Corpus Loading
//!
//! The corpus is a static, ordered list of keyword/answer pairs plus a list
//! of fallback responses, authored offline (`agricultural_qa.json`). Entry
//! order is significant: ties during matching keep the earlier entry, so
//! the authoring order from the file is preserved exactly.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::normalize::normalize;

/// One keyword/answer pair.
#[derive(Debug, Clone, Deserialize)]
pub struct QaEntry {
    pub keywords: Vec<String>,
    pub answer: String,

    /// Keywords run through the same normalization as incoming messages,
    /// built at load time.
    #[serde(skip)]
    pub(crate) normalized_keywords: Vec<String>,
}

impl QaEntry {
    /// Entries about watering are eligible for climate-specific
    /// augmentation when the request carries a weather reading.
    pub(crate) fn wants_weather(&self) -> bool {
        self.keywords
            .iter()
            .any(|k| k == "irrigation" || k == "water")
    }
}

#[derive(Debug, Deserialize)]
struct CorpusFile {
    qa_pairs: Vec<QaEntry>,
    fallback_responses: Vec<String>,
}

/// Loaded QA corpus, immutable for the process lifetime.
#[derive(Debug)]
pub struct QaCorpus {
    pub(crate) entries: Vec<QaEntry>,
    pub(crate) fallbacks: Vec<String>,
}

impl QaCorpus {
    /// Load the corpus from an `agricultural_qa.json` artifact.
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read QA corpus: {}", path))?;
        let file: CorpusFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse QA corpus: {}", path))?;

        Self::build(file.qa_pairs, file.fallback_responses)
    }

    /// Build from in-memory parts, preserving entry order.
    ///
    /// The fallback list must be non-empty: the no-match path always
    /// returns one of its members.
    pub fn from_parts(pairs: Vec<(Vec<String>, String)>, fallbacks: Vec<String>) -> Result<Self> {
        let entries = pairs
            .into_iter()
            .map(|(keywords, answer)| QaEntry {
                keywords,
                answer,
                normalized_keywords: Vec::new(),
            })
            .collect();
        Self::build(entries, fallbacks)
    }

    fn build(mut entries: Vec<QaEntry>, fallbacks: Vec<String>) -> Result<Self> {
        if fallbacks.is_empty() {
            bail!("QA corpus has no fallback responses");
        }
        for (i, entry) in entries.iter_mut().enumerate() {
            if entry.keywords.is_empty() {
                bail!("QA entry {} has no keywords", i);
            }
            entry.normalized_keywords = entry.keywords.iter().map(|k| normalize(k)).collect();
        }
        Ok(Self { entries, fallbacks })
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_normalized_at_load() {
        let corpus = QaCorpus::from_parts(
            vec![(
                vec!["irrigation".to_string(), "Watering".to_string()],
                "answer".to_string(),
            )],
            vec!["fallback".to_string()],
        )
        .unwrap();

        assert_eq!(
            corpus.entries()[0].normalized_keywords,
            vec!["irrigat".to_string(), "water".to_string()]
        );
        // Raw keywords keep their authored form.
        assert_eq!(corpus.entries()[0].keywords[1], "Watering");
    }

    #[test]
    fn empty_fallback_list_rejected() {
        let result = QaCorpus::from_parts(
            vec![(vec!["water".to_string()], "answer".to_string())],
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn keywordless_entry_rejected() {
        let result = QaCorpus::from_parts(
            vec![(vec![], "answer".to_string())],
            vec!["fallback".to_string()],
        );
        assert!(result.is_err());
    }
}
