//! Fixed ten-question grading rubric.
//!
//! Raw reviewer ratings arrive on per-question scales and are first normalized to a common
//! 1-5 grade, then weighted into a composite total that decides approval. Both steps are pure
//! functions; every consumer (intake preview, reviewer scoring, exports) shares this module.

mod composite;
mod normalizer;
mod rubric;

pub use composite::{
    classify_total, round_to_tenth, score_composite, AssessmentStatus, CompositeResult,
    PASS_THRESHOLD, QUESTION_WEIGHT,
};
pub use normalizer::{normalize_grade, try_normalize_grade};
pub use rubric::{RatingScale, QUESTION_COUNT, RUBRIC};

use serde::{Deserialize, Serialize};

/// Domain errors raised by the strict grading entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradingError {
    #[error("question index {0} is outside the rubric")]
    UnknownQuestion(usize),
    #[error("rating for question {question} is not a finite number")]
    NonFiniteRating { question: usize },
    #[error("rating {rating} for question {question} is outside 0..={max}")]
    RatingOutOfRange {
        question: usize,
        rating: f64,
        max: u8,
    },
    #[error("expected {expected} grades, found {found}")]
    WrongQuestionCount { expected: usize, found: usize },
}

/// Per-question grades together with the composite they reduce to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub grades: Vec<u8>,
    pub unrated: usize,
    pub composite: CompositeResult,
}

impl ScoreSheet {
    pub fn is_complete(&self) -> bool {
        self.unrated == 0
    }
}

/// Normalize each rating in rubric order and reduce the result to a composite.
///
/// `None` marks a question that has not been rated yet; it contributes grade 0 exactly like a
/// rating of zero but is counted separately in [`ScoreSheet::unrated`].
pub fn score_ratings(ratings: &[Option<f64>]) -> Result<ScoreSheet, GradingError> {
    let grades: Vec<u8> = ratings
        .iter()
        .enumerate()
        .map(|(index, rating)| normalize_grade(*rating, index))
        .collect();
    let composite = score_composite(&grades)?;
    let unrated = ratings.iter().filter(|rating| rating.is_none()).count();

    Ok(ScoreSheet {
        grades,
        unrated,
        composite,
    })
}
