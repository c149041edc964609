use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{AssessmentId, AssessmentLifecycle, AssessmentRecord, ReviewerRef};
use super::intake::{AssessmentPayload, IntakeError, IntakeValidator};
use super::repository::{
    AssessmentRepository, DecisionNotice, DecisionPublisher, PublishError, RepositoryError,
};
use super::session::SessionContext;
use crate::grading::{score_ratings, AssessmentStatus, GradingError, ScoreSheet};

/// Service composing intake validation, storage, the grading engine, and notices.
pub struct AssessmentService<R, P, S> {
    validator: IntakeValidator,
    repository: Arc<R>,
    publisher: Arc<P>,
    session: Arc<S>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

impl<R, P, S> AssessmentService<R, P, S>
where
    R: AssessmentRepository + 'static,
    P: DecisionPublisher + 'static,
    S: SessionContext + 'static,
{
    pub fn new(repository: Arc<R>, publisher: Arc<P>, session: Arc<S>) -> Self {
        Self::with_validator(IntakeValidator::default(), repository, publisher, session)
    }

    pub fn with_validator(
        validator: IntakeValidator,
        repository: Arc<R>,
        publisher: Arc<P>,
        session: Arc<S>,
    ) -> Self {
        Self {
            validator,
            repository,
            publisher,
            session,
        }
    }

    /// Validate and store a new assessment.
    pub fn submit(&self, payload: AssessmentPayload) -> Result<AssessmentRecord, ServiceError> {
        let validated = self.validator.validate(payload)?;

        let record = AssessmentRecord {
            id: next_assessment_id(),
            applicant: validated.applicant,
            answers: validated.answers,
            lifecycle: AssessmentLifecycle::Submitted,
            submitted_at: Utc::now(),
            reviewer: None,
            scored_at: None,
            score: None,
        };

        let stored = self.repository.insert(record)?;
        info!(assessment_id = %stored.id.0, applicant_id = %stored.applicant.applicant_id, "assessment submitted");
        Ok(stored)
    }

    /// Score a payload without storing it.
    pub fn preview(&self, payload: AssessmentPayload) -> Result<ScoreSheet, ServiceError> {
        let validated = self.validator.validate(payload)?;
        let sheet = score_ratings(&validated.ratings())?;
        debug!(total = sheet.composite.total, "assessment preview scored");
        Ok(sheet)
    }

    /// Score a stored assessment on behalf of the signed-in reviewer.
    ///
    /// A decision notice goes out only when the approve/reject outcome differs from the
    /// stored one. The notice is published before the record is saved, so a failed notice
    /// leaves the stored record untouched and a retry publishes again.
    pub fn score(&self, id: &AssessmentId) -> Result<ScoreSheet, ServiceError> {
        let session_user = self.session.user().ok_or(ServiceError::Unauthenticated)?;

        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let sheet = score_ratings(&record.ratings())?;
        if !sheet.is_complete() {
            warn!(assessment_id = %id.0, unrated = sheet.unrated, "scoring assessment with unrated questions");
        }

        let composite = sheet.composite;
        let previous = record.score.as_ref().map(|stored| stored.composite.status);
        if previous == Some(composite.status) {
            debug!(assessment_id = %id.0, status = %composite.status, "decision unchanged; no notice sent");
        } else {
            self.publisher.publish(decision_notice(id, &sheet))?;
        }

        record.lifecycle = AssessmentLifecycle::Scored;
        record.reviewer = Some(ReviewerRef {
            username: session_user.username.clone(),
            display_name: session_user.display_name,
        });
        record.scored_at = Some(Utc::now());
        record.score = Some(sheet.clone());
        self.repository.update(record)?;

        info!(
            assessment_id = %id.0,
            reviewer = %session_user.username,
            total = composite.total,
            status = %composite.status,
            "assessment scored"
        );

        Ok(sheet)
    }

    /// Fetch an assessment for API responses.
    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, ServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Submitted assessments still waiting for a reviewer.
    pub fn pending(&self, limit: usize) -> Result<Vec<AssessmentRecord>, ServiceError> {
        let records = self
            .repository
            .list_by_lifecycle(AssessmentLifecycle::Submitted, limit)?;
        Ok(records)
    }
}

fn decision_notice(id: &AssessmentId, sheet: &ScoreSheet) -> DecisionNotice {
    let composite = sheet.composite;
    let template = match composite.status {
        AssessmentStatus::Approved => "assessment_approved",
        AssessmentStatus::Rejected => "assessment_rejected",
    };

    let mut details = BTreeMap::new();
    details.insert("status".to_string(), composite.status.label().to_string());
    details.insert("grade".to_string(), composite.grade.to_string());
    details.insert("total".to_string(), format!("{:.1}", composite.total));

    DecisionNotice {
        template: template.to_string(),
        assessment_id: id.clone(),
        details,
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("no reviewer is signed in")]
    Unauthenticated,
}
