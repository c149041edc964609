use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::ScoreSheet;

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Doctoral applicant the assessment is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRef {
    pub applicant_id: String,
    pub full_name: String,
}

/// Reviewer who scored an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerRef {
    pub username: String,
    pub display_name: String,
}

/// One answered rubric question, in rubric order.
///
/// `rating: None` means the reviewer has not rated the question yet; `Some(0.0)` is an
/// explicit zero. Both normalize to grade 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricAnswer {
    pub question: String,
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentLifecycle {
    Submitted,
    Scored,
}

impl AssessmentLifecycle {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentLifecycle::Submitted => "submitted",
            AssessmentLifecycle::Scored => "scored",
        }
    }
}

/// Repository record holding the validated answers and the latest score, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub applicant: ApplicantRef,
    pub answers: Vec<RubricAnswer>,
    pub lifecycle: AssessmentLifecycle,
    pub submitted_at: DateTime<Utc>,
    pub reviewer: Option<ReviewerRef>,
    pub scored_at: Option<DateTime<Utc>>,
    pub score: Option<ScoreSheet>,
}

impl AssessmentRecord {
    pub fn ratings(&self) -> Vec<Option<f64>> {
        self.answers.iter().map(|answer| answer.rating).collect()
    }

    pub fn decision_rationale(&self) -> String {
        match &self.score {
            Some(sheet) => sheet.composite.summary(),
            None => "pending scoring".to_string(),
        }
    }

    pub fn status_view(&self) -> AssessmentStatusView {
        let composite = self.score.as_ref().map(|sheet| sheet.composite);
        AssessmentStatusView {
            assessment_id: self.id.clone(),
            applicant_id: self.applicant.applicant_id.clone(),
            lifecycle: self.lifecycle.label(),
            decision_rationale: self.decision_rationale(),
            status: composite.map(|result| result.status.label()),
            grade: composite.map(|result| result.grade),
            total: composite.map(|result| result.total),
            unrated: self.score.as_ref().map(|sheet| sheet.unrated),
            reviewer: self
                .reviewer
                .as_ref()
                .map(|reviewer| reviewer.display_name.clone()),
        }
    }
}

/// Public representation of an assessment's progress.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub applicant_id: String,
    pub lifecycle: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrated: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
}
