use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::AssessmentId;
use super::intake::AssessmentPayload;
use super::repository::{AssessmentRepository, DecisionPublisher, RepositoryError};
use super::service::{AssessmentService, ServiceError};
use super::session::SessionContext;
use crate::grading::{score_composite, try_normalize_grade, GradingError};

type SharedService<R, P, S> = Arc<AssessmentService<R, P, S>>;

/// Router builder exposing assessment intake, scoring, and the grading calculator.
pub fn assessment_router<R, P, S>(service: SharedService<R, P, S>) -> Router
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            post(submit_handler::<R, P, S>).get(pending_handler::<R, P, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id",
            get(status_handler::<R, P, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/score",
            post(score_handler::<R, P, S>),
        )
        .route("/api/v1/grading/normalize", post(normalize_handler))
        .route("/api/v1/grading/composite", post(composite_handler))
        .route("/api/v1/grading/preview", post(preview_handler::<R, P, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct NormalizeRequest {
    pub(crate) question: usize,
    #[serde(default)]
    pub(crate) rating: Option<f64>,
}

const DEFAULT_PENDING_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub(crate) struct PendingQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompositeRequest {
    pub(crate) grades: Vec<u8>,
}

pub(crate) async fn submit_handler<R, P, S>(
    State(service): State<SharedService<R, P, S>>,
    axum::Json(payload): axum::Json<AssessmentPayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    match service.submit(payload) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn pending_handler<R, P, S>(
    State(service): State<SharedService<R, P, S>>,
    Query(query): Query<PendingQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_PENDING_LIMIT);
    match service.pending(limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, P, S>(
    State(service): State<SharedService<R, P, S>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    match service.get(&AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, P, S>(
    State(service): State<SharedService<R, P, S>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    match service.score(&AssessmentId(assessment_id)) {
        Ok(sheet) => (StatusCode::OK, axum::Json(sheet)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<R, P, S>(
    State(service): State<SharedService<R, P, S>>,
    axum::Json(payload): axum::Json<AssessmentPayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    match service.preview(payload) {
        Ok(sheet) => (StatusCode::OK, axum::Json(sheet)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn normalize_handler(axum::Json(request): axum::Json<NormalizeRequest>) -> Response {
    match try_normalize_grade(request.rating, request.question) {
        Ok(grade) => (
            StatusCode::OK,
            axum::Json(json!({ "question": request.question, "grade": grade })),
        )
            .into_response(),
        Err(err) => grading_error_response(err),
    }
}

pub(crate) async fn composite_handler(axum::Json(request): axum::Json<CompositeRequest>) -> Response {
    match score_composite(&request.grades) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => grading_error_response(err),
    }
}

fn grading_error_response(err: GradingError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

pub(crate) fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Intake(_) | ServiceError::Grading(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::Repository(RepositoryError::Unavailable(_)) | ServiceError::Publish(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
