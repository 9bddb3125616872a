//! API routes for the study server

pub mod content;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle - with larger body limit for the upload
        .route(
            "/sessions",
            post(sessions::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/sessions/:id/status", get(sessions::session_status))
        .route("/sessions/:id", delete(sessions::delete_session))
        // Content generation (requires a Ready session)
        .route("/sessions/:id/summary", get(content::summary))
        .route("/sessions/:id/keypoints", get(content::keypoints))
        .route("/sessions/:id/quiz", get(content::quiz))
        .route("/sessions/:id/qa", post(content::answer_question))
        .route("/sessions/:id/history", get(content::history))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "study-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document study service with background indexing and quiz generation",
        "endpoints": {
            "POST /api/sessions": "Upload a document, returns a session id",
            "GET /api/sessions/:id/status": "Poll processing state",
            "GET /api/sessions/:id/summary": "Document summary (?short=true for brief)",
            "GET /api/sessions/:id/keypoints": "Key points (?count=N)",
            "GET /api/sessions/:id/quiz": "Multiple-choice quiz (?n=N)",
            "POST /api/sessions/:id/qa": "Answer a question about the document",
            "GET /api/sessions/:id/history": "Question/answer history",
            "DELETE /api/sessions/:id": "Delete the session and its files"
        }
    }))
}
