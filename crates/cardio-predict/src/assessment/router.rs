use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{AssessmentId, ClinicalRecord, PatientSubmission};
use super::history::HistoryQuery;
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};
use super::validation::SubmissionError;

/// Router exposing assessment intake, history, and dashboard endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            post(submit_handler::<R>).get(history_handler::<R>),
        )
        .route(
            "/api/v1/assessments/preview",
            post(preview_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id",
            get(fetch_handler::<R>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(submission): Json<PatientSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(record): Json<ClinicalRecord>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.preview(&record) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "assessment not found",
                "assessment_id": id.0,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.history(&query) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.dashboard() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = if err.is_validation() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        match err {
            AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    };

    let payload = match &err {
        AssessmentServiceError::InvalidField(field_err)
        | AssessmentServiceError::Submission(SubmissionError::InvalidField(field_err)) => json!({
            "error": err.to_string(),
            "field": field_err.field(),
        }),
        _ => json!({ "error": err.to_string() }),
    };

    (status, Json(payload)).into_response()
}
