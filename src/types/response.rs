//! API response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quiz::{ChatTurn, QuizItem};

/// Response from a document upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: Uuid,
    pub filename: String,
    pub message: String,
}

/// Response from a status query
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    /// "processing", "ready", or "failed"
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
}

/// Response from a summary request
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    pub summary: String,
}

/// Response from a key points request
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyPointsResponse {
    pub session_id: Uuid,
    pub keypoints: Vec<String>,
}

/// Response from a quiz request
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub session_id: Uuid,
    pub quiz: Vec<QuizItem>,
}

/// Response from a question answering request
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub session_id: Uuid,
    pub answer: String,
}

/// Response from a history request
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub turns: Vec<ChatTurn>,
}
