//! Background processing pipeline for one session
//!
//! One worker task per session, spawned from the create call site. The
//! caller never blocks on it and never sees its errors: every outcome,
//! including a panic inside the build, is converted into exactly one
//! terminal registry transition.

use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::chain::DocumentChain;
use crate::error::{Error, Result};
use crate::index::Indexer;
use crate::session::SessionRegistry;

/// Runs the validate → index → ready sequence off the calling task
pub struct PipelineWorker;

impl PipelineWorker {
    /// Spawn the pipeline for `id`. Returns immediately; progress is
    /// observable only through the registry's `status`.
    pub fn spawn(
        registry: Arc<SessionRegistry>,
        indexer: Arc<dyn Indexer>,
        id: Uuid,
        source: PathBuf,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            Self::run(registry, indexer, id, source).await;
        })
    }

    async fn run(
        registry: Arc<SessionRegistry>,
        indexer: Arc<dyn Indexer>,
        id: Uuid,
        source: PathBuf,
    ) {
        tracing::info!("[{}] Pipeline started for {}", id, source.display());

        // Run the build in its own task so a panic surfaces as a join
        // error here instead of killing the terminal-state guarantee.
        let build = tokio::spawn(async move { Self::build(indexer, id, source).await });

        let outcome = match build.await {
            Ok(result) => result,
            Err(join_error) => Err(Error::Internal(format!(
                "Pipeline task aborted: {}",
                join_error
            ))),
        };

        match outcome {
            Ok(chain) => {
                tracing::info!("[{}] Pipeline complete ({} chunks)", id, chain.chunk_count());
                if let Err(e) = registry.mark_ready(id, chain) {
                    // Session was deleted mid-build; nothing left to update
                    tracing::warn!("[{}] Could not mark ready: {}", id, e);
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("[{}] Pipeline failed: {}", id, message);
                if let Err(e) = registry.mark_failed(id, message) {
                    tracing::warn!("[{}] Could not mark failed: {}", id, e);
                }
            }
        }
    }

    async fn build(
        indexer: Arc<dyn Indexer>,
        id: Uuid,
        source: PathBuf,
    ) -> Result<Arc<DocumentChain>> {
        if !source.exists() {
            return Err(Error::Indexing(format!(
                "Source not found: {}",
                source.display()
            )));
        }
        indexer.build(id, &source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;

    use crate::chain::test_support::{chain_with, ScriptedLlm};

    /// Indexer stub with a scripted outcome
    struct StubIndexer {
        fail_with: Option<String>,
        panic: bool,
    }

    impl StubIndexer {
        fn ok() -> Self {
            Self {
                fail_with: None,
                panic: false,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                panic: false,
            }
        }

        fn panicking() -> Self {
            Self {
                fail_with: None,
                panic: true,
            }
        }
    }

    #[async_trait]
    impl Indexer for StubIndexer {
        async fn build(&self, _id: Uuid, _source: &Path) -> Result<Arc<DocumentChain>> {
            if self.panic {
                panic!("index build blew up");
            }
            match &self.fail_with {
                Some(message) => Err(Error::Indexing(message.clone())),
                None => Ok(Arc::new(chain_with(ScriptedLlm::new(vec!["ok"])))),
            }
        }
    }

    fn temp_source() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".txt").tempfile().unwrap()
    }

    #[tokio::test]
    async fn successful_build_marks_ready() {
        let registry = Arc::new(SessionRegistry::new());
        let source = temp_source();
        let id = registry.create("doc.txt");

        PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::ok()),
            id,
            source.path().to_path_buf(),
        )
        .await
        .unwrap();

        assert_eq!(registry.status(id).unwrap().state, "ready");
        assert!(registry.get_ready(id).is_ok());
    }

    #[tokio::test]
    async fn missing_source_marks_failed_without_calling_the_indexer() {
        let registry = Arc::new(SessionRegistry::new());
        let id = registry.create("ghost.txt");

        PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::panicking()), // would panic if reached
            id,
            PathBuf::from("/nonexistent/ghost.txt"),
        )
        .await
        .unwrap();

        let status = registry.status(id).unwrap();
        assert_eq!(status.state, "failed");
        assert!(status.error.unwrap().contains("Source not found"));
    }

    #[tokio::test]
    async fn indexer_error_is_captured_as_failed() {
        let registry = Arc::new(SessionRegistry::new());
        let source = temp_source();
        let id = registry.create("doc.txt");

        PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::failing("embedding service unreachable")),
            id,
            source.path().to_path_buf(),
        )
        .await
        .unwrap();

        let status = registry.status(id).unwrap();
        assert_eq!(status.state, "failed");
        assert!(status.error.unwrap().contains("embedding service unreachable"));
    }

    #[tokio::test]
    async fn indexer_panic_still_reaches_a_terminal_state() {
        let registry = Arc::new(SessionRegistry::new());
        let source = temp_source();
        let id = registry.create("doc.txt");

        PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::panicking()),
            id,
            source.path().to_path_buf(),
        )
        .await
        .unwrap();

        let status = registry.status(id).unwrap();
        assert_eq!(status.state, "failed");
    }

    #[tokio::test]
    async fn deleted_session_does_not_resurrect() {
        let registry = Arc::new(SessionRegistry::new());
        let source = temp_source();
        let id = registry.create("doc.txt");

        // Session disappears while the build is in flight
        registry.delete(id);

        PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::ok()),
            id,
            source.path().to_path_buf(),
        )
        .await
        .unwrap();

        assert!(matches!(
            registry.status(id),
            Err(Error::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_sessions_settle_independently() {
        let registry = Arc::new(SessionRegistry::new());
        let source = temp_source();

        let ok_id = registry.create("good.txt");
        let bad_id = registry.create("bad.txt");

        let ok = PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::ok()),
            ok_id,
            source.path().to_path_buf(),
        );
        let bad = PipelineWorker::spawn(
            Arc::clone(&registry),
            Arc::new(StubIndexer::failing("boom")),
            bad_id,
            source.path().to_path_buf(),
        );

        ok.await.unwrap();
        bad.await.unwrap();

        assert_eq!(registry.status(ok_id).unwrap().state, "ready");
        assert_eq!(registry.status(bad_id).unwrap().state, "failed");
    }
}
