//! Shared session registry and lifecycle state machine
//!
//! The registry is the only mutable shared state in the core. All access
//! goes through its operation contract; the map itself is never exposed.
//! State transitions are `Processing -> Ready` and `Processing -> Failed`,
//! both terminal. Reprocessing a document means deleting the session and
//! creating a new one.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::chain::DocumentChain;
use crate::error::{Error, Result};

/// Lifecycle state of a session.
///
/// The handle and the failure cause live inside their variants, which makes
/// their mutual exclusion structural: neither can exist while `Processing`.
#[derive(Clone)]
pub enum SessionState {
    /// Pipeline is running in the background
    Processing,
    /// Index built; the handle serves content generation
    Ready(Arc<DocumentChain>),
    /// Pipeline failed; human-readable cause
    Failed(String),
}

impl SessionState {
    /// Lowercase label used in status responses and transition errors
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Processing => "processing",
            SessionState::Ready(_) => "ready",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// One document-processing session
pub struct Session {
    pub id: Uuid,
    /// Original filename, for status display
    pub source_name: String,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
}

/// Read-only status snapshot
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub id: Uuid,
    pub state: &'static str,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Concurrency-safe store of all sessions.
///
/// Backed by a sharded map whose per-entry guards make every transition
/// mutually exclusive with reads and writes of the same entry, which gives
/// the happens-before edge between `mark_*` and later `status`/`get_ready`.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Session>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new session in `Processing` state and return its id
    pub fn create(&self, source_name: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                id,
                source_name: source_name.into(),
                state: SessionState::Processing,
                created_at: Utc::now(),
            },
        );
        tracing::info!("Session {} created", id);
        id
    }

    /// Transition a `Processing` session to `Ready`, attaching its handle
    pub fn mark_ready(&self, id: Uuid, chain: Arc<DocumentChain>) -> Result<()> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(Error::SessionNotFound(id))?;

        if !matches!(session.state, SessionState::Processing) {
            return Err(Error::InvalidTransition {
                id,
                from: session.state.label(),
                to: "ready",
            });
        }
        session.state = SessionState::Ready(chain);
        tracing::info!("Session {} ready", id);
        Ok(())
    }

    /// Transition a `Processing` session to `Failed`, attaching the cause
    pub fn mark_failed(&self, id: Uuid, error: impl Into<String>) -> Result<()> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(Error::SessionNotFound(id))?;

        if !matches!(session.state, SessionState::Processing) {
            return Err(Error::InvalidTransition {
                id,
                from: session.state.label(),
                to: "failed",
            });
        }
        let error = error.into();
        tracing::warn!("Session {} failed: {}", id, error);
        session.state = SessionState::Failed(error);
        Ok(())
    }

    /// Read the current status of a session
    pub fn status(&self, id: Uuid) -> Result<SessionStatus> {
        let session = self.sessions.get(&id).ok_or(Error::SessionNotFound(id))?;
        Ok(SessionStatus {
            id,
            state: session.state.label(),
            error: match &session.state {
                SessionState::Failed(cause) => Some(cause.clone()),
                _ => None,
            },
            created_at: session.created_at,
        })
    }

    /// Get the query handle of a `Ready` session
    pub fn get_ready(&self, id: Uuid) -> Result<Arc<DocumentChain>> {
        let session = self.sessions.get(&id).ok_or(Error::SessionNotFound(id))?;
        match &session.state {
            SessionState::Ready(chain) => Ok(Arc::clone(chain)),
            _ => Err(Error::NotReady(id)),
        }
    }

    /// Remove a session, releasing its handle. Idempotent: removing an
    /// unknown id is not an error. Returns whether a session was removed;
    /// the caller is responsible for releasing external resources (uploaded
    /// file, index artifact).
    pub fn delete(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            tracing::info!("Session {} deleted", id);
        }
        removed
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if no sessions exist
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::test_support::{chain_with, ScriptedLlm};

    fn ready_chain() -> Arc<DocumentChain> {
        Arc::new(chain_with(ScriptedLlm::new(vec!["answer"])))
    }

    #[test]
    fn create_starts_processing() {
        let registry = SessionRegistry::new();
        let id = registry.create("doc.pdf");

        let status = registry.status(id).unwrap();
        assert_eq!(status.state, "processing");
        assert!(status.error.is_none());
    }

    #[test]
    fn mark_ready_is_terminal() {
        let registry = SessionRegistry::new();
        let id = registry.create("doc.pdf");

        registry.mark_ready(id, ready_chain()).unwrap();
        assert_eq!(registry.status(id).unwrap().state, "ready");

        // Neither transition may leave Ready
        assert!(matches!(
            registry.mark_ready(id, ready_chain()),
            Err(Error::InvalidTransition { from: "ready", .. })
        ));
        assert!(matches!(
            registry.mark_failed(id, "late failure"),
            Err(Error::InvalidTransition { from: "ready", .. })
        ));
        assert_eq!(registry.status(id).unwrap().state, "ready");
    }

    #[test]
    fn mark_failed_is_terminal_and_carries_the_cause() {
        let registry = SessionRegistry::new();
        let id = registry.create("doc.pdf");

        registry.mark_failed(id, "disk on fire").unwrap();
        let status = registry.status(id).unwrap();
        assert_eq!(status.state, "failed");
        assert_eq!(status.error.as_deref(), Some("disk on fire"));

        assert!(registry.mark_ready(id, ready_chain()).is_err());
    }

    #[test]
    fn get_ready_gates_on_state() {
        let registry = SessionRegistry::new();
        let id = registry.create("doc.pdf");
        assert!(matches!(registry.get_ready(id), Err(Error::NotReady(_))));

        registry.mark_ready(id, ready_chain()).unwrap();
        assert!(registry.get_ready(id).is_ok());

        let failed = registry.create("other.pdf");
        registry.mark_failed(failed, "nope").unwrap();
        assert!(matches!(registry.get_ready(failed), Err(Error::NotReady(_))));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();

        assert!(matches!(registry.status(id), Err(Error::SessionNotFound(_))));
        assert!(matches!(
            registry.get_ready(id),
            Err(Error::SessionNotFound(_))
        ));
        assert!(matches!(
            registry.mark_ready(id, ready_chain()),
            Err(Error::SessionNotFound(_))
        ));
        assert!(matches!(
            registry.mark_failed(id, "x"),
            Err(Error::SessionNotFound(_))
        ));
    }

    #[test]
    fn delete_is_idempotent_and_forgets_the_session() {
        let registry = SessionRegistry::new();
        let id = registry.create("doc.pdf");

        assert!(registry.delete(id));
        assert!(!registry.delete(id));
        assert!(matches!(registry.status(id), Err(Error::SessionNotFound(_))));
    }

    #[test]
    fn concurrent_creates_yield_distinct_sessions() {
        let registry = Arc::new(SessionRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|j| registry.create(format!("doc-{}-{}.pdf", i, j)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(registry.len(), 400);
    }

    #[test]
    fn concurrent_transitions_settle_exactly_once() {
        let registry = Arc::new(SessionRegistry::new());
        let id = registry.create("doc.pdf");

        let winners: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        registry.mark_ready(id, ready_chain()).is_ok()
                    } else {
                        registry.mark_failed(id, "lost the race").is_ok()
                    }
                })
            })
            .map(|h| h.join().unwrap())
            .collect();

        // Exactly one transition wins; the state is terminal either way
        assert_eq!(winners.iter().filter(|w| **w).count(), 1);
        let state = registry.status(id).unwrap().state;
        assert!(state == "ready" || state == "failed");
    }
}
