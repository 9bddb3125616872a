//! Document index construction and similarity search
//!
//! The [`Indexer`] trait is the seam between the session pipeline and the
//! index technology; [`ChunkIndexer`] is the default implementation
//! (extract → chunk → embed → in-memory cosine index, persisted as a JSON
//! artifact per session).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::chain::DocumentChain;
use crate::config::{ChunkingConfig, RetrievalConfig};
use crate::error::{Error, Result};
use crate::ingestion::{extract_text, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider};

/// One indexed chunk of document text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Chunk text
    pub content: String,
    /// Embedding vector (zero vector if embedding failed)
    pub embedding: Vec<f32>,
    /// Position of the chunk within the document
    pub position: usize,
}

/// A chunk returned from a search, with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a IndexedChunk,
    pub score: f32,
}

/// In-memory vector index over the chunks of one document.
///
/// Immutable after construction; brute-force cosine search is plenty for a
/// single document's chunk count.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Build an index from embedded chunks
    pub fn new(chunks: Vec<IndexedChunk>) -> Self {
        Self { chunks }
    }

    /// Number of chunks in the index
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Return the `top_k` chunks most similar to the query embedding
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk<'_>> {
        let mut scored: Vec<ScoredChunk<'_>> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                chunk,
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Persist the index as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)
            .map_err(|e| Error::Internal(format!("Failed to serialize index: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a persisted index artifact
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Internal(format!("Failed to parse index artifact: {}", e)))
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Builds a ready-to-query [`DocumentChain`] from a source document.
///
/// Must be safe to invoke from a background task.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Build the index for one session's source document
    async fn build(&self, session_id: Uuid, source: &Path) -> Result<Arc<DocumentChain>>;
}

/// Default indexer: extract text, chunk, embed, persist
pub struct ChunkIndexer {
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunking: ChunkingConfig,
    retrieval: RetrievalConfig,
    index_dir: PathBuf,
}

impl ChunkIndexer {
    /// Create a new indexer
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunking: ChunkingConfig,
        retrieval: RetrievalConfig,
        index_dir: PathBuf,
    ) -> Self {
        Self {
            llm,
            embedder,
            chunking,
            retrieval,
            index_dir,
        }
    }

    /// Path of the persisted artifact for a session
    pub fn artifact_path(index_dir: &Path, session_id: Uuid) -> PathBuf {
        index_dir.join(format!("{}.json", session_id))
    }
}

#[async_trait]
impl Indexer for ChunkIndexer {
    async fn build(&self, session_id: Uuid, source: &Path) -> Result<Arc<DocumentChain>> {
        tracing::info!("[{}] Extracting text from {}", session_id, source.display());
        let text = extract_text(source)?;

        let chunker = TextChunker::from_config(&self.chunking);
        let texts = chunker.chunk_text(&text);
        if texts.is_empty() {
            return Err(Error::Indexing("Document produced no chunks".to_string()));
        }
        tracing::info!("[{}] Created {} chunks, generating embeddings...", session_id, texts.len());

        let mut chunks = Vec::with_capacity(texts.len());
        let mut failed = 0usize;
        for (position, content) in texts.into_iter().enumerate() {
            let embedding = match self.embedder.embed(&content).await {
                Ok(embedding) => embedding,
                Err(e) => {
                    failed += 1;
                    tracing::warn!("[{}] Embedding failed for chunk {}: {}", session_id, position, e);
                    // Zero vector keeps the chunk retrievable by position
                    vec![0.0; self.embedder.dimensions()]
                }
            };
            chunks.push(IndexedChunk {
                content,
                embedding,
                position,
            });
        }
        if failed > 0 {
            tracing::warn!("[{}] {} embeddings failed, using fallback vectors", session_id, failed);
        }

        let index = VectorIndex::new(chunks);

        let artifact = Self::artifact_path(&self.index_dir, session_id);
        index.save(&artifact)?;
        tracing::info!(
            "[{}] Index ready: {} chunks, artifact at {}",
            session_id,
            index.len(),
            artifact.display()
        );

        Ok(Arc::new(DocumentChain::new(
            index,
            Arc::clone(&self.llm),
            Arc::clone(&self.embedder),
            self.retrieval.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, embedding: Vec<f32>, position: usize) -> IndexedChunk {
        IndexedChunk {
            content: content.to_string(),
            embedding,
            position,
        }
    }

    #[test]
    fn search_ranks_by_cosine_similarity() {
        let index = VectorIndex::new(vec![
            chunk("orthogonal", vec![0.0, 1.0], 0),
            chunk("aligned", vec![1.0, 0.0], 1),
            chunk("opposite", vec![-1.0, 0.0], 2),
        ]);

        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "aligned");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn top_k_is_bounded_by_index_size() {
        let index = VectorIndex::new(vec![chunk("only", vec![1.0], 0)]);
        assert_eq!(index.search(&[1.0], 10).len(), 1);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let index = VectorIndex::new(vec![chunk("persisted", vec![0.5, 0.5], 0)]);
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.chunks[0].content, "persisted");
    }
}
