//! Quiz candidate normalization
//!
//! Best-effort repair of backend-produced candidates into strict
//! [`QuizItem`]s. Each field has one total resolution rule; candidates that
//! cannot be repaired are skipped without aborting the batch.

use serde_json::{Map, Value};

use crate::types::quiz::{QuizItem, QUIZ_OPTION_COUNT};

/// Minimum options a candidate must supply to be repairable
const MIN_OPTIONS: usize = 2;

/// Explanation used when the candidate provides none
pub const DEFAULT_EXPLANATION: &str = "Check the document for details.";

/// Normalize a batch of candidates.
///
/// An empty result means validation failed entirely and the caller should
/// fall back.
pub fn validate_candidates(candidates: &[Value]) -> Vec<QuizItem> {
    let items: Vec<QuizItem> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| validate_candidate(candidate, i + 1))
        .collect();

    if items.len() < candidates.len() {
        tracing::info!(
            "Validated {}/{} quiz candidates",
            items.len(),
            candidates.len()
        );
    }
    items
}

/// Normalize one candidate; `position` is 1-based for synthesized questions
fn validate_candidate(candidate: &Value, position: usize) -> Option<QuizItem> {
    let fields = candidate.as_object()?;

    let options = resolve_options(fields)?;
    let item = QuizItem {
        question: resolve_question(fields, position),
        answer_index: resolve_answer_index(fields.get("answer"), options.len()),
        options,
        explanation: resolve_explanation(fields),
    };

    debug_assert!(item.is_well_formed());
    Some(item)
}

/// `q`, then `question`, then a synthesized `"Question {n}"`
fn resolve_question(fields: &Map<String, Value>, position: usize) -> String {
    fields
        .get("q")
        .or_else(|| fields.get("question"))
        .and_then(non_empty_str)
        .unwrap_or_else(|| format!("Question {}", position))
}

/// `options`, then `choices`; fewer than 2 entries rejects the candidate.
/// Pads with placeholders to exactly 4, truncates past 4.
fn resolve_options(fields: &Map<String, Value>) -> Option<Vec<String>> {
    let raw = fields
        .get("options")
        .or_else(|| fields.get("choices"))?
        .as_array()?;

    let mut options: Vec<String> = raw.iter().map(value_to_text).collect();
    if options.len() < MIN_OPTIONS {
        return None;
    }

    while options.len() < QUIZ_OPTION_COUNT {
        options.push(format!("Additional option {}", options.len() + 1));
    }
    options.truncate(QUIZ_OPTION_COUNT);
    Some(options)
}

/// `answer` as letter A-D (case-insensitive) or in-range number; everything
/// else defaults to 0
fn resolve_answer_index(answer: Option<&Value>, option_count: usize) -> usize {
    let index = match answer {
        Some(Value::String(s)) => letter_to_index(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    };

    if index >= 0 && (index as usize) < option_count {
        index as usize
    } else {
        0
    }
}

fn letter_to_index(s: &str) -> i64 {
    match s.trim().to_ascii_uppercase().as_str() {
        "A" => 0,
        "B" => 1,
        "C" => 2,
        "D" => 3,
        _ => 0,
    }
}

/// `explanation`, defaulting to [`DEFAULT_EXPLANATION`]
fn resolve_explanation(fields: &Map<String, Value>) -> String {
    fields
        .get("explanation")
        .and_then(non_empty_str)
        .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string())
}

fn non_empty_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Render any JSON scalar as option text; non-string values are stringified
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
