use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use doctoral_assessment::grading::{RatingScale, PASS_THRESHOLD, QUESTION_WEIGHT, RUBRIC};
use doctoral_assessment::workflows::assessment::{
    assessment_router, AssessmentRepository, AssessmentService, DecisionPublisher,
    SessionContext,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct RubricQuestionView {
    pub(crate) index: usize,
    pub(crate) scale: RatingScale,
    pub(crate) scale_label: &'static str,
    pub(crate) max_rating: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct RubricView {
    pub(crate) weight: f64,
    pub(crate) pass_threshold: f64,
    pub(crate) questions: Vec<RubricQuestionView>,
}

pub(crate) fn with_assessment_routes<R, P, S>(
    service: Arc<AssessmentService<R, P, S>>,
) -> axum::Router
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/grading/rubric", axum::routing::get(rubric_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn rubric_endpoint() -> Json<RubricView> {
    let questions = RUBRIC
        .iter()
        .enumerate()
        .map(|(index, scale)| RubricQuestionView {
            index,
            scale: *scale,
            scale_label: scale.label(),
            max_rating: scale.max(),
        })
        .collect();

    Json(RubricView {
        weight: QUESTION_WEIGHT,
        pass_threshold: PASS_THRESHOLD,
        questions,
    })
}
