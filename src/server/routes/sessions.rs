//! Session lifecycle endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{SessionStatusResponse, UploadResponse};

/// Extensions the parser can handle
const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "txt", "md", "markdown"];

fn allowed_file(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// POST /api/sessions - Upload a document and start processing
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidRequest("No file selected".to_string()))?;

        if !allowed_file(&filename) {
            return Err(Error::InvalidRequest(
                "Only PDF, TXT, and Markdown files are allowed".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("Failed to read file: {}", e)))?;
        if data.is_empty() {
            return Err(Error::InvalidRequest("Uploaded file is empty".to_string()));
        }

        tracing::info!("Uploading: {} ({} bytes)", filename, data.len());
        let session_id = state.start_session(&filename, &data)?;

        return Ok(Json(UploadResponse {
            session_id,
            filename,
            message: "Document uploaded. Processing started...".to_string(),
        }));
    }

    Err(Error::InvalidRequest("No file provided".to_string()))
}

/// GET /api/sessions/:id/status - Poll processing state
pub async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionStatusResponse>> {
    let status = state.registry().status(id)?;
    Ok(Json(SessionStatusResponse {
        session_id: id,
        state: status.state.to_string(),
        error: status.error,
        created_at: status.created_at.to_rfc3339(),
    }))
}

/// Response from a session deletion
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub session_id: Uuid,
    pub deleted: bool,
    pub message: String,
}

/// DELETE /api/sessions/:id - Remove the session and its files.
/// Idempotent: deleting an unknown id succeeds with `deleted: false`.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<DeleteResponse> {
    let deleted = state.delete_session(id);
    Json(DeleteResponse {
        session_id: id,
        deleted,
        message: format!("Session {} deleted", id),
    })
}
