//! Session lifecycle: shared registry and background processing

pub mod pipeline;
pub mod registry;

pub use pipeline::PipelineWorker;
pub use registry::{Session, SessionRegistry, SessionState, SessionStatus};
