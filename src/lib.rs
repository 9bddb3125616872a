//! study-rag: document study service with background indexing
//!
//! Upload a document, let a background pipeline build a queryable index,
//! then generate summaries, key points, multiple-choice quizzes, and
//! free-form answers from it with a local LLM. Quiz generation repairs the
//! backend's unreliable JSON through layered extraction, validation, and
//! fallback so it always returns at least one well-formed question.

pub mod chain;
pub mod config;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod quiz;
pub mod server;
pub mod session;
pub mod storage;
pub mod types;

pub use config::StudyConfig;
pub use error::{Error, Result};
pub use types::{ChatTurn, QuizItem};
