//! Content generation endpoints
//!
//! Every endpoint here reads the Ready handle through the registry and runs
//! a single backend round-trip. A failed call surfaces a typed error and
//! never mutates session state.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::quiz;
use crate::server::state::AppState;
use crate::types::{
    AnswerResponse, HistoryResponse, KeyPointsResponse, QuizResponse, SummaryResponse,
};

/// Query parameters for the summary endpoint
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    #[serde(default)]
    pub short: bool,
}

/// GET /api/sessions/:id/summary - Generate a document summary
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>> {
    let chain = state.registry().get_ready(id)?;
    tracing::info!(
        "Generating {} summary for {}",
        if params.short { "short" } else { "full" },
        id
    );

    let summary = chain.summary(params.short).await?;
    Ok(Json(SummaryResponse {
        session_id: id,
        summary,
    }))
}

/// Query parameters for the keypoints endpoint
#[derive(Debug, Deserialize)]
pub struct KeyPointsParams {
    #[serde(default = "default_keypoint_count")]
    pub count: usize,
}

fn default_keypoint_count() -> usize {
    8
}

/// GET /api/sessions/:id/keypoints - Extract key points
pub async fn keypoints(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<KeyPointsParams>,
) -> Result<Json<KeyPointsResponse>> {
    if params.count < 1 {
        return Err(Error::InvalidRequest("count must be at least 1".to_string()));
    }

    let chain = state.registry().get_ready(id)?;
    tracing::info!("Extracting {} keypoints for {}", params.count, id);

    let keypoints = chain.key_points(params.count).await?;
    Ok(Json(KeyPointsResponse {
        session_id: id,
        keypoints,
    }))
}

/// Query parameters for the quiz endpoint
#[derive(Debug, Deserialize)]
pub struct QuizParams {
    pub n: Option<usize>,
}

/// GET /api/sessions/:id/quiz - Generate a multiple-choice quiz.
/// Always returns at least one question for a Ready session.
pub async fn quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<QuizParams>,
) -> Result<Json<QuizResponse>> {
    let n = params.n.unwrap_or(state.config().quiz.default_questions);
    if n < 1 {
        return Err(Error::InvalidRequest("n must be at least 1".to_string()));
    }

    let chain = state.registry().get_ready(id)?;
    tracing::info!("Generating {} quiz questions for {}", n, id);

    let items = quiz::generate(&chain, n, &state.config().quiz).await;
    Ok(Json(QuizResponse {
        session_id: id,
        quiz: items,
    }))
}

/// Request body for question answering
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: String,
}

/// POST /api/sessions/:id/qa - Answer a question about the document
pub async fn answer_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>> {
    if request.question.trim().is_empty() {
        return Err(Error::InvalidRequest("question missing".to_string()));
    }

    let chain = state.registry().get_ready(id)?;
    tracing::info!(
        "Answering question for {}: {:.50}",
        id,
        request.question
    );

    let answer = chain.ask(&request.question).await?;
    Ok(Json(AnswerResponse {
        session_id: id,
        answer,
    }))
}

/// GET /api/sessions/:id/history - Question/answer audit trail
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>> {
    let chain = state.registry().get_ready(id)?;
    Ok(Json(HistoryResponse {
        session_id: id,
        turns: chain.history(),
    }))
}
