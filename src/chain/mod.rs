//! Ready-to-query document handle
//!
//! A [`DocumentChain`] is the opaque handle attached to a Ready session. It
//! owns the document's vector index and serves every content-generation
//! operation with a single backend round-trip. The index is immutable after
//! build and the chat history sits behind a short-lived mutex, so the handle
//! tolerates concurrent calls without per-session serialization.

pub mod prompt;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::index::VectorIndex;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::types::ChatTurn;

pub use prompt::PromptBuilder;

/// Query handle for one indexed document
pub struct DocumentChain {
    index: VectorIndex,
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    retrieval: RetrievalConfig,
    history: Mutex<Vec<ChatTurn>>,
}

impl DocumentChain {
    /// Create a chain over a built index
    pub fn new(
        index: VectorIndex,
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            llm,
            embedder,
            retrieval,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Number of chunks in the underlying index
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Retrieve context and run one backend generation for `question`.
    ///
    /// Does not touch the chat history; [`ask`](Self::ask) records turns.
    pub async fn query(&self, question: &str) -> Result<String> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, self.retrieval.top_k);

        let mut context = String::new();
        for result in &results {
            if !context.is_empty() {
                context.push('\n');
            }
            context.push_str(&result.chunk.content);
        }
        // Bound what reaches the model
        if context.len() > self.retrieval.max_context_chars {
            let mut end = self.retrieval.max_context_chars;
            while end > 0 && !context.is_char_boundary(end) {
                end -= 1;
            }
            context.truncate(end);
        }

        let prompt = PromptBuilder::build_qa_prompt(question, &context);
        tracing::debug!("Querying backend ({} context chars)", context.len());
        self.llm.generate(&prompt).await
    }

    /// Answer a user question and record the turn in the session history
    pub async fn ask(&self, question: &str) -> Result<String> {
        let answer = self.query(question).await?;
        self.history.lock().push(ChatTurn::new(question, answer.clone()));
        Ok(answer)
    }

    /// Generate a document summary
    pub async fn summary(&self, short: bool) -> Result<String> {
        self.query(&PromptBuilder::summary_question(short)).await
    }

    /// Extract key points as individual lines
    pub async fn key_points(&self, count: usize) -> Result<Vec<String>> {
        let response = self.query(&PromptBuilder::keypoints_question(count)).await?;
        let points: Vec<String> = response
            .lines()
            .map(str::trim)
            .filter(|line| line.len() > 2)
            .map(String::from)
            .collect();

        // A response with no usable lines still yields one point
        if points.is_empty() {
            Ok(vec![response])
        } else {
            Ok(points)
        }
    }

    /// Ask the backend for the document's main topics, one per line
    pub async fn topics(&self) -> Result<Vec<String>> {
        let response = self.query(&PromptBuilder::topics_question()).await?;
        Ok(response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Snapshot of the session's chat history, in request order
    pub fn history(&self) -> Vec<ChatTurn> {
        self.history.lock().clone()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{chain_with, ScriptedLlm};

    #[tokio::test]
    async fn ask_records_history_in_order() {
        let chain = chain_with(ScriptedLlm::new(vec!["First answer.", "Second answer."]));

        chain.ask("First question?").await.unwrap();
        chain.ask("Second question?").await.unwrap();

        let history = chain.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "First question?");
        assert_eq!(history[0].answer, "First answer.");
        assert_eq!(history[1].question, "Second question?");
    }

    #[tokio::test]
    async fn query_does_not_record_history() {
        let chain = chain_with(ScriptedLlm::new(vec!["An answer."]));
        chain.query("Internal prompt").await.unwrap();
        assert!(chain.history().is_empty());
    }

    #[tokio::test]
    async fn key_points_splits_lines() {
        let chain = chain_with(ScriptedLlm::new(vec![
            "1. Ownership moves values.\n2. Borrowing lends access.\n\n3. Lifetimes bound borrows.",
        ]));

        let points = chain.key_points(3).await.unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].contains("Ownership"));
    }

    #[tokio::test]
    async fn key_points_falls_back_to_whole_answer() {
        let chain = chain_with(ScriptedLlm::new(vec!["ok"]));
        let points = chain.key_points(5).await.unwrap();
        assert_eq!(points, vec!["ok".to_string()]);
    }

    #[tokio::test]
    async fn backend_failure_propagates_without_history() {
        let chain = chain_with(ScriptedLlm::failing());
        assert!(chain.ask("Q?").await.is_err());
        assert!(chain.history().is_empty());
    }

    #[tokio::test]
    async fn topics_drops_blank_lines() {
        let chain = chain_with(ScriptedLlm::new(vec!["Ownership\n\nBorrowing\n  \nLifetimes"]));
        let topics = chain.topics().await.unwrap();
        assert_eq!(topics, vec!["Ownership", "Borrowing", "Lifetimes"]);
    }
}
