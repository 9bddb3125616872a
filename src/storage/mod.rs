//! On-disk storage of uploaded documents and index artifacts
//!
//! The store owns every file a session leaves behind: the uploaded source
//! at `<upload_dir>/<id>.<ext>` and the index artifact at
//! `<index_dir>/<id>.json`. Session deletion must call [`DocumentStore::remove`]
//! so both disappear with the session.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::index::ChunkIndexer;

/// Filesystem store for session-scoped documents
pub struct DocumentStore {
    upload_dir: PathBuf,
    index_dir: PathBuf,
}

impl DocumentStore {
    /// Create the store, ensuring both directories exist
    pub fn new(config: &StorageConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.upload_dir)?;
        std::fs::create_dir_all(&config.index_dir)?;
        Ok(Self {
            upload_dir: config.upload_dir.clone(),
            index_dir: config.index_dir.clone(),
        })
    }

    /// Directory index artifacts are written into
    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// Persist an uploaded document under the session id, keeping the
    /// original extension so the parser can dispatch on it
    pub fn save_upload(&self, id: Uuid, original_name: &str, data: &[u8]) -> Result<PathBuf> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let path = self.upload_dir.join(format!("{}.{}", id, ext));
        std::fs::write(&path, data)?;
        tracing::info!("Saved upload {} ({} bytes) to {}", original_name, data.len(), path.display());
        Ok(path)
    }

    /// Remove every file belonging to a session. Idempotent; missing files
    /// are not errors.
    pub fn remove(&self, id: Uuid) {
        let stem = id.to_string();

        if let Ok(entries) = std::fs::read_dir(&self.upload_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                let matches = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s == stem)
                    .unwrap_or(false);
                if matches {
                    if let Err(e) = std::fs::remove_file(&path) {
                        tracing::warn!("Failed to delete upload {}: {}", path.display(), e);
                    } else {
                        tracing::info!("Deleted upload {}", path.display());
                    }
                }
            }
        }

        let artifact = ChunkIndexer::artifact_path(&self.index_dir, id);
        if artifact.exists() {
            if let Err(e) = std::fs::remove_file(&artifact) {
                tracing::warn!("Failed to delete index artifact {}: {}", artifact.display(), e);
            } else {
                tracing::info!("Deleted index artifact {}", artifact.display());
            }
        }
    }
}
