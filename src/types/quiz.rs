//! Quiz and chat history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of options every validated quiz item carries
pub const QUIZ_OPTION_COUNT: usize = 4;

/// One validated multiple-choice question.
///
/// Invariant: `options.len() == 4` and `answer_index < 4` for every item
/// produced by the validator or the fallback synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizItem {
    /// Question text (non-empty)
    pub question: String,
    /// Exactly 4 answer options
    pub options: Vec<String>,
    /// Index of the correct option, in [0, 4)
    pub answer_index: usize,
    /// Explanation for the correct answer (non-empty, defaulted if absent)
    pub explanation: String,
}

impl QuizItem {
    /// Check the validator invariant
    pub fn is_well_formed(&self) -> bool {
        !self.question.is_empty()
            && self.options.len() == QUIZ_OPTION_COUNT
            && self.answer_index < self.options.len()
            && !self.explanation.is_empty()
    }
}

/// One question/answer pair in a session's interaction history.
///
/// Audit trail only; turns are never re-injected into future prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// The question as asked
    pub question: String,
    /// The generated answer
    pub answer: String,
    /// When the turn completed
    pub asked_at: DateTime<Utc>,
}

impl ChatTurn {
    /// Create a turn stamped with the current time
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_item_passes() {
        let item = QuizItem {
            question: "What is Rust?".to_string(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            answer_index: 2,
            explanation: "See chapter 1.".to_string(),
        };
        assert!(item.is_well_formed());
    }

    #[test]
    fn short_options_fail_invariant() {
        let item = QuizItem {
            question: "Q".to_string(),
            options: vec!["A".into(), "B".into()],
            answer_index: 0,
            explanation: "x".to_string(),
        };
        assert!(!item.is_well_formed());
    }

    #[test]
    fn out_of_range_answer_fails_invariant() {
        let item = QuizItem {
            question: "Q".to_string(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            answer_index: 4,
            explanation: "x".to_string(),
        };
        assert!(!item.is_well_formed());
    }
}
