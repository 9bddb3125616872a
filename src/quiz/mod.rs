//! Quiz generation pipeline: extract → validate → fallback
//!
//! The public contract is unconditional: [`generate`] always returns at
//! least one well-formed [`QuizItem`], whatever the backend produced.

pub mod extract;
pub mod fallback;
pub mod validate;

use crate::chain::{DocumentChain, PromptBuilder};
use crate::config::QuizConfig;
use crate::types::QuizItem;

pub use extract::{extract_candidates, ExtractionStrategy};
pub use validate::validate_candidates;

/// Generate a quiz of `n_questions` from the document behind `chain`.
///
/// Extraction and validation failures are absorbed by the fallback
/// synthesizer; only the item count can degrade, never the call itself.
pub async fn generate(chain: &DocumentChain, n_questions: usize, config: &QuizConfig) -> Vec<QuizItem> {
    let n_questions = n_questions.max(1);
    tracing::info!("Generating {} quiz questions", n_questions);

    match chain.query(&PromptBuilder::quiz_question(n_questions)).await {
        Ok(response) => {
            if let Some(candidates) = extract_candidates(&response) {
                let items = validate_candidates(&candidates);
                if !items.is_empty() {
                    tracing::info!("Returning {} validated questions", items.len());
                    return items;
                }
                tracing::warn!("All {} quiz candidates were rejected", candidates.len());
            }
        }
        Err(e) => {
            tracing::warn!("Quiz backend call failed: {}", e);
        }
    }

    vec![fallback::synthesize(chain, config.topic_fallback).await]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::test_support::{chain_with, ScriptedLlm};

    fn config() -> QuizConfig {
        QuizConfig::default()
    }

    #[tokio::test]
    async fn clean_json_response_is_validated() {
        let chain = chain_with(ScriptedLlm::new(vec![
            r#"{"quiz":[{"q":"Q1","options":["A","B","C"],"answer":"B","explanation":"x"}]}"#,
        ]));

        let items = generate(&chain, 5, &config()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "Q1");
        assert_eq!(items[0].options.len(), 4);
        assert_eq!(items[0].answer_index, 1);
    }

    #[tokio::test]
    async fn prose_wrapped_array_still_yields_items() {
        let chain = chain_with(ScriptedLlm::new(vec![
            "Sure! Here's your quiz: [{\"q\":\"Q1\",\"options\":[\"A\",\"B\"],\"answer\":0}] Hope that helps!",
        ]));

        let items = generate(&chain, 1, &config()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "Q1");
        assert_eq!(items[0].options.len(), 4);
    }

    #[tokio::test]
    async fn plain_prose_falls_through_to_topic_tier() {
        // First response: no structure at all. Second: the topic re-query.
        let chain = chain_with(ScriptedLlm::new(vec![
            "I'm sorry, I can't produce JSON today.",
            "Ownership\nBorrowing\nLifetimes\nTraits",
        ]));

        let items = generate(&chain, 3, &config()).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_well_formed());
        assert_eq!(items[0].options[0], "Ownership");
    }

    #[tokio::test]
    async fn dead_backend_still_returns_a_quiz() {
        let chain = chain_with(ScriptedLlm::failing());
        let items = generate(&chain, 5, &config()).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_well_formed());
    }

    #[tokio::test]
    async fn empty_response_still_returns_a_quiz() {
        let chain = chain_with(ScriptedLlm::new(vec![""]));
        let items = generate(&chain, 5, &config()).await;
        assert!(!items.is_empty());
        assert!(items.iter().all(QuizItem::is_well_formed));
    }

    #[tokio::test]
    async fn all_candidates_rejected_triggers_fallback() {
        // Parses fine, but every candidate has too few options
        let chain = chain_with(ScriptedLlm::new(vec![
            r#"{"quiz":[{"q":"Q1","options":["only"]},{"q":"Q2","options":[]}]}"#,
        ]));

        let items = generate(&chain, 2, &config()).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_well_formed());
    }

    #[tokio::test]
    async fn zero_question_request_is_clamped() {
        let chain = chain_with(ScriptedLlm::new(vec![
            r#"{"quiz":[{"q":"Q1","options":["A","B"],"answer":0}]}"#,
        ]));
        let items = generate(&chain, 0, &config()).await;
        assert!(!items.is_empty());
    }
}
