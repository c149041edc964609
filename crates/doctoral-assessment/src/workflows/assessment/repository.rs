use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentId, AssessmentLifecycle, AssessmentRecord};

/// Storage abstraction; the remote backend owns the real state.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn list_by_lifecycle(
        &self,
        lifecycle: AssessmentLifecycle,
        limit: usize,
    ) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for decision notices (e-mail, applicant portal).
pub trait DecisionPublisher: Send + Sync {
    fn publish(&self, notice: DecisionNotice) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNotice {
    pub template: String,
    pub assessment_id: AssessmentId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("notice transport unavailable: {0}")]
    Transport(String),
}
