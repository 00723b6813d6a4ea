//! Progress API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use mlv_progress::{ProgressSnapshot, QuizAnswer, QuizCompletion, quiz_id};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for POST /api/progress/done/{slug}.
#[derive(Serialize)]
pub(crate) struct DoneResponse {
    done: Vec<String>,
}

/// Body of PUT /api/progress/quiz/{slug}/total.
#[derive(Deserialize)]
pub(crate) struct TotalRequest {
    total: u32,
}

/// Body of PUT /api/progress/quiz/{slug}/answers.
///
/// The question is identified either by its text or by a full quiz id.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerRequest {
    question: Option<String>,
    quiz_id: Option<String>,
    selected: u32,
    correct: bool,
}

/// Query of GET /api/progress/quiz/{slug}/answers.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerQuery {
    question: Option<String>,
    quiz_id: Option<String>,
}

/// Pick the quiz id from an explicit id or the question text.
fn resolve_quiz_id(
    slug: &str,
    quiz_id_field: Option<String>,
    question: Option<&str>,
) -> Result<String, ServerError> {
    match (quiz_id_field, question) {
        (Some(id), _) if !id.is_empty() => Ok(id),
        (_, Some(question)) if !question.is_empty() => Ok(quiz_id(slug, question)),
        _ => Err(ServerError::BadRequest(
            "either quizId or question is required".to_owned(),
        )),
    }
}

/// Handle GET /api/progress.
pub(crate) async fn get_progress(State(state): State<Arc<AppState>>) -> Json<ProgressSnapshot> {
    Json(state.progress.snapshot())
}

/// Handle POST /api/progress/done/{slug}.
pub(crate) async fn toggle_done(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DoneResponse>, ServerError> {
    let done = state.progress.toggle_done(&slug)?;
    Ok(Json(DoneResponse { done }))
}

/// Handle PUT /api/progress/quiz/{slug}/total.
pub(crate) async fn put_quiz_total(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<TotalRequest>,
) -> Result<Json<QuizCompletion>, ServerError> {
    state.progress.set_quiz_total(&slug, request.total)?;
    Ok(Json(state.progress.quiz_completion(&slug)))
}

/// Handle PUT /api/progress/quiz/{slug}/answers.
pub(crate) async fn put_quiz_answer(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<QuizCompletion>, ServerError> {
    let id = resolve_quiz_id(&slug, request.quiz_id, request.question.as_deref())?;
    state
        .progress
        .set_quiz_answer(&slug, &id, request.selected, request.correct)?;
    Ok(Json(state.progress.quiz_completion(&slug)))
}

/// Handle GET /api/progress/quiz/{slug}/answers.
pub(crate) async fn get_quiz_answer(
    Path(slug): Path<String>,
    Query(query): Query<AnswerQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuizAnswer>, ServerError> {
    let id = resolve_quiz_id(&slug, query.quiz_id, query.question.as_deref())?;
    state
        .progress
        .quiz_answer(&slug, &id)
        .map(Json)
        .ok_or(ServerError::NotFound(id))
}
