//! Keyword Matching
//!
//! Scores the normalized message against every corpus entry in authoring
//! order. An entry's score is the count of its normalized keywords found as
//! substrings of the normalized message; a later entry replaces the running
//! best only on a strictly higher score, so ties keep the first-seen entry.
//! Zero matches fall back to a uniformly random canned response — the
//! random source is injected so tests can pin it.

use rand::Rng;

use super::corpus::QaCorpus;
use super::normalize::normalize;
use crate::advice::{climate_advice, WeatherReading};

/// Lead-in for climate-specific augmentation of a watering answer.
const WEATHER_LEAD_IN: &str = "Specific to your current conditions: ";

impl QaCorpus {
    /// Answer a free-text message, optionally personalized with weather.
    pub fn answer<R: Rng>(
        &self,
        message: &str,
        weather: Option<&WeatherReading>,
        rng: &mut R,
    ) -> String {
        let normalized = normalize(message);

        let mut best_score = 0;
        let mut best = None;
        for entry in &self.entries {
            let score = entry
                .normalized_keywords
                .iter()
                .filter(|keyword| normalized.contains(keyword.as_str()))
                .count();
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        let entry = match best {
            Some(entry) => entry,
            // Nothing matched at all; fallbacks are non-empty by corpus invariant.
            None => return self.fallbacks[rng.gen_range(0..self.fallbacks.len())].clone(),
        };

        let mut answer = entry.answer.clone();
        if let Some(weather) = weather {
            if entry.wants_weather() {
                let advice = climate_advice(weather);
                if !advice.is_empty() {
                    answer.push_str("\n\n");
                    answer.push_str(WEATHER_LEAD_IN);
                    answer.push_str(&advice);
                }
            }
        }
        answer
    }
}
