//! Assessment intake and reviewer scoring on top of the grading rubric.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantRef, AssessmentId, AssessmentLifecycle, AssessmentRecord, AssessmentStatusView,
    ReviewerRef, RubricAnswer,
};
pub use intake::{
    AnswerPayload, AssessmentPayload, IntakeError, IntakeValidator, RatingInput,
    ValidatedAssessment,
};
pub use repository::{
    AssessmentRepository, DecisionNotice, DecisionPublisher, PublishError, RepositoryError,
};
pub use router::assessment_router;
pub use service::{AssessmentService, ServiceError};
pub use session::{InMemorySession, SessionContext, SessionUser};
