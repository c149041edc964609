use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRef, RubricAnswer};
use crate::grading::{try_normalize_grade, GradingError, QUESTION_COUNT};

/// Assessment body as delivered by the REST backend.
///
/// The backend is loose about shape: the list may be called `questions` or `answers`, and
/// `rating` may be missing, `null`, a number, or a number encoded as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPayload {
    pub applicant: ApplicantRef,
    #[serde(alias = "questions")]
    pub answers: Vec<AnswerPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub rating: Option<RatingInput>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Number(f64),
    Text(String),
}

impl RatingInput {
    /// Blank strings count as "not yet rated".
    fn resolve(&self, question: usize) -> Result<Option<f64>, IntakeError> {
        match self {
            RatingInput::Number(value) => Ok(Some(*value)),
            RatingInput::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| IntakeError::UnparseableRating {
                        question,
                        value: raw.clone(),
                    })
            }
        }
    }
}

/// Validation errors raised while accepting an assessment payload.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("applicant identifier is required")]
    MissingApplicant,
    #[error("assessment must answer exactly {expected} questions, found {found}")]
    WrongAnswerCount { expected: usize, found: usize },
    #[error("question {question} has no text")]
    MissingQuestion { question: usize },
    #[error("rating '{value}' for question {question} is not numeric")]
    UnparseableRating { question: usize, value: String },
    #[error("question {question} has not been rated")]
    Unrated { question: usize },
    #[error(transparent)]
    Rating(#[from] GradingError),
}

/// Answers that passed intake; always exactly one per rubric question.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAssessment {
    pub applicant: ApplicantRef,
    pub answers: Vec<RubricAnswer>,
}

impl ValidatedAssessment {
    pub fn ratings(&self) -> Vec<Option<f64>> {
        self.answers.iter().map(|answer| answer.rating).collect()
    }
}

/// Ingress check turning loosely typed payloads into [`ValidatedAssessment`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeValidator {
    require_complete: bool,
}

impl IntakeValidator {
    /// Validator that additionally rejects payloads with unrated questions.
    pub fn requiring_complete() -> Self {
        Self {
            require_complete: true,
        }
    }

    pub fn requires_complete(&self) -> bool {
        self.require_complete
    }

    pub fn validate(&self, payload: AssessmentPayload) -> Result<ValidatedAssessment, IntakeError> {
        let AssessmentPayload { applicant, answers } = payload;

        if applicant.applicant_id.trim().is_empty() {
            return Err(IntakeError::MissingApplicant);
        }

        if answers.len() != QUESTION_COUNT {
            return Err(IntakeError::WrongAnswerCount {
                expected: QUESTION_COUNT,
                found: answers.len(),
            });
        }

        let mut validated = Vec::with_capacity(QUESTION_COUNT);
        for (index, answer) in answers.into_iter().enumerate() {
            let question = answer.question.trim().to_string();
            if question.is_empty() {
                return Err(IntakeError::MissingQuestion { question: index });
            }

            let rating = match &answer.rating {
                Some(input) => input.resolve(index)?,
                None => None,
            };
            if rating.is_none() && self.require_complete {
                return Err(IntakeError::Unrated { question: index });
            }
            try_normalize_grade(rating, index)?;

            let feedback = answer
                .feedback
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty());

            validated.push(RubricAnswer {
                question,
                rating,
                feedback,
            });
        }

        Ok(ValidatedAssessment {
            applicant,
            answers: validated,
        })
    }
}
