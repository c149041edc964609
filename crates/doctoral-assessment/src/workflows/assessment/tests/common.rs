use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    ApplicantRef, AssessmentId, AssessmentLifecycle, AssessmentRecord,
};
use crate::workflows::assessment::intake::{AnswerPayload, AssessmentPayload, RatingInput};
use crate::workflows::assessment::repository::{
    AssessmentRepository, DecisionNotice, DecisionPublisher, PublishError, RepositoryError,
};
use crate::workflows::assessment::session::{InMemorySession, SessionUser};
use crate::workflows::assessment::{assessment_router, AssessmentService};

pub(super) const QUESTIONS: [&str; 10] = [
    "Relevance of the research topic",
    "Originality of the proposal",
    "State of the art review",
    "Research methodology",
    "Expected results",
    "Publication record",
    "Work plan feasibility",
    "Bibliography",
    "Presentation quality",
    "Supervisor endorsement",
];

pub(super) fn applicant() -> ApplicantRef {
    ApplicantRef {
        applicant_id: "cand-0042".to_string(),
        full_name: "Ana Petrova".to_string(),
    }
}

pub(super) fn payload_with(ratings: [Option<f64>; 10]) -> AssessmentPayload {
    AssessmentPayload {
        applicant: applicant(),
        answers: QUESTIONS
            .iter()
            .zip(ratings)
            .map(|(question, rating)| AnswerPayload {
                question: question.to_string(),
                rating: rating.map(RatingInput::Number),
                feedback: Some("Reviewed against the admission rubric".to_string()),
            })
            .collect(),
    }
}

/// Ratings that normalize to grade 4 on every question (total 88.0).
pub(super) fn strong_ratings() -> [Option<f64>; 10] {
    [
        Some(4.0),
        Some(4.0),
        Some(15.0),
        Some(8.0),
        Some(15.0),
        Some(12.0),
        Some(7.0),
        Some(8.0),
        Some(4.0),
        Some(7.0),
    ]
}

/// Ratings that normalize to grade 2 on every question (total 44.0).
pub(super) fn weak_ratings() -> [Option<f64>; 10] {
    [
        Some(2.0),
        Some(2.0),
        Some(6.0),
        Some(3.0),
        Some(6.0),
        Some(5.0),
        Some(4.0),
        Some(2.0),
        Some(2.0),
        Some(1.0),
    ]
}

pub(super) fn strong_payload() -> AssessmentPayload {
    payload_with(strong_ratings())
}

pub(super) fn weak_payload() -> AssessmentPayload {
    payload_with(weak_ratings())
}

pub(super) fn reviewer() -> SessionUser {
    SessionUser {
        username: "prof.kowalska".to_string(),
        display_name: "Prof. Kowalska".to_string(),
    }
}

pub(super) fn signed_in_session() -> Arc<InMemorySession> {
    Arc::new(InMemorySession::signed_in("token-123", reviewer()))
}

pub(super) type TestService = AssessmentService<MemoryRepository, MemoryNotices, InMemorySession>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryNotices>) {
    let repository = Arc::new(MemoryRepository::default());
    let notices = Arc::new(MemoryNotices::default());
    let service = AssessmentService::new(repository.clone(), notices.clone(), signed_in_session());
    (service, repository, notices)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_by_lifecycle(
        &self,
        lifecycle: AssessmentLifecycle,
        limit: usize,
    ) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.lifecycle == lifecycle)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotices {
    events: Arc<Mutex<Vec<DecisionNotice>>>,
}

impl MemoryNotices {
    pub(super) fn events(&self) -> Vec<DecisionNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl DecisionPublisher for MemoryNotices {
    fn publish(&self, notice: DecisionNotice) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(None)
    }

    fn list_by_lifecycle(
        &self,
        _lifecycle: AssessmentLifecycle,
        _limit: usize,
    ) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct OfflineNotices;

impl DecisionPublisher for OfflineNotices {
    fn publish(&self, _notice: DecisionNotice) -> Result<(), PublishError> {
        Err(PublishError::Transport("smtp offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    assessment_router(Arc::new(service))
}
