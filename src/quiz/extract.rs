//! Extraction strategies for locating a quiz object in generated text
//!
//! The backend is asked for pure JSON but routinely wraps it in prose,
//! markdown fences, or trailing commentary. Strategies are tried in a fixed
//! order; the first one producing a non-empty candidate list wins.

use regex::Regex;
use serde_json::Value;

/// One way of locating and parsing quiz candidates inside raw text
pub trait ExtractionStrategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Return candidate items, or `None` on parse failure or empty result
    fn try_extract(&self, text: &str) -> Option<Vec<Value>>;
}

/// Strategy 1: the entire response is a JSON object with a `quiz` array
pub struct WholeResponse;

impl ExtractionStrategy for WholeResponse {
    fn name(&self) -> &'static str {
        "whole_response"
    }

    fn try_extract(&self, text: &str) -> Option<Vec<Value>> {
        let parsed: Value = serde_json::from_str(text.trim()).ok()?;
        let quiz = parsed.get("quiz")?.as_array()?;
        non_empty(quiz.clone())
    }
}

/// Strategy 2: smallest embedded object containing a `"quiz": [...]` key
pub struct QuizObjectScan;

impl ExtractionStrategy for QuizObjectScan {
    fn name(&self) -> &'static str {
        "quiz_object_scan"
    }

    fn try_extract(&self, text: &str) -> Option<Vec<Value>> {
        let pattern = Regex::new(r#"(?s)\{[^{}]*"quiz"\s*:\s*\[.*?\]\s*\}"#)
            .expect("Invalid regex");
        let matched = pattern.find(text)?;
        let parsed: Value = serde_json::from_str(matched.as_str()).ok()?;
        let quiz = parsed.get("quiz")?.as_array()?;
        non_empty(quiz.clone())
    }
}

/// Strategy 3: first embedded array, its elements taken as candidates
pub struct ArrayScan;

impl ExtractionStrategy for ArrayScan {
    fn name(&self) -> &'static str {
        "array_scan"
    }

    fn try_extract(&self, text: &str) -> Option<Vec<Value>> {
        let pattern = Regex::new(r"(?s)\[(?:[^\[\]]|\[[^\]]*\])*\]").expect("Invalid regex");
        let matched = pattern.find(text)?;
        let parsed: Value = serde_json::from_str(matched.as_str()).ok()?;
        let items = parsed.as_array()?;
        non_empty(items.clone())
    }
}

fn non_empty(items: Vec<Value>) -> Option<Vec<Value>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// The ordered strategy list
fn strategies() -> [&'static dyn ExtractionStrategy; 3] {
    [&WholeResponse, &QuizObjectScan, &ArrayScan]
}

/// Run the strategies in order; first non-empty candidate list wins.
///
/// `None` means extraction failed entirely and the caller should fall back.
pub fn extract_candidates(text: &str) -> Option<Vec<Value>> {
    for strategy in strategies() {
        if let Some(candidates) = strategy.try_extract(text) {
            tracing::info!(
                "Extracted {} quiz candidates via {}",
                candidates.len(),
                strategy.name()
            );
            return Some(candidates);
        }
    }
    tracing::warn!("All extraction strategies failed ({} chars of input)", text.len());
    None
}
