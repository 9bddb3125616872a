//! Application state for the study server

use std::sync::Arc;
use uuid::Uuid;

use crate::config::StudyConfig;
use crate::error::Result;
use crate::index::{ChunkIndexer, Indexer};
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaClient};
use crate::session::{PipelineWorker, SessionRegistry};
use crate::storage::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: StudyConfig,
    /// Session lifecycle store
    registry: Arc<SessionRegistry>,
    /// Index builder handed to pipeline workers
    indexer: Arc<dyn Indexer>,
    /// LLM provider (shared with the indexer's chains)
    llm: Arc<dyn LlmProvider>,
    /// Upload and artifact storage
    store: DocumentStore,
}

impl AppState {
    /// Create new application state
    pub fn new(config: StudyConfig) -> Result<Self> {
        tracing::info!("Initializing study-rag application state...");

        let ollama = Arc::new(OllamaClient::new(&config.llm));
        let llm: Arc<dyn LlmProvider> = ollama.clone();
        let embedder: Arc<dyn EmbeddingProvider> = ollama;
        tracing::info!(
            "Ollama client initialized (generate: {}, embed: {})",
            config.llm.generate_model,
            config.llm.embed_model
        );

        let store = DocumentStore::new(&config.storage)?;
        tracing::info!("Document store initialized");

        let indexer: Arc<dyn Indexer> = Arc::new(ChunkIndexer::new(
            Arc::clone(&llm),
            embedder,
            config.chunking.clone(),
            config.retrieval.clone(),
            config.storage.index_dir.clone(),
        ));

        let registry = Arc::new(SessionRegistry::new());
        tracing::info!("Session registry initialized");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                indexer,
                llm,
                store,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &StudyConfig {
        &self.inner.config
    }

    /// Get the session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.inner.registry
    }

    /// Get the LLM provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    /// Register a new session for an uploaded document and start its
    /// pipeline. Returns the session id immediately; processing happens in
    /// the background.
    pub fn start_session(&self, filename: &str, data: &[u8]) -> Result<Uuid> {
        let id = self.inner.registry.create(filename);

        let source = match self.inner.store.save_upload(id, filename, data) {
            Ok(path) => path,
            Err(e) => {
                // Upload never reached disk; forget the session entirely
                self.inner.registry.delete(id);
                return Err(e);
            }
        };

        // Fire-and-forget: the session is observable only through `status`
        let _ = PipelineWorker::spawn(
            Arc::clone(&self.inner.registry),
            Arc::clone(&self.inner.indexer),
            id,
            source,
        );

        Ok(id)
    }

    /// Delete a session and every resource it owns. Idempotent.
    pub fn delete_session(&self, id: Uuid) -> bool {
        let removed = self.inner.registry.delete(id);
        self.inner.store.remove(id);
        removed
    }
}
