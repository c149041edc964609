use std::fmt;

use serde::{Deserialize, Serialize};

use super::rubric::QUESTION_COUNT;
use super::GradingError;

/// Multiplier applied to every normalized grade.
pub const QUESTION_WEIGHT: f64 = 2.2;

/// Lowest composite total that is approved.
pub const PASS_THRESHOLD: f64 = 60.0;

const GOOD_THRESHOLD: f64 = 70.0;
const EXCELLENT_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Approved,
    Rejected,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Approved => "approved",
            AssessmentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted total of one assessment and its classification.
///
/// `grade` is 0 whenever `status` is rejected, regardless of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub grade: u8,
    pub status: AssessmentStatus,
    pub total: f64,
}

impl CompositeResult {
    pub fn is_approved(&self) -> bool {
        self.status == AssessmentStatus::Approved
    }

    pub fn summary(&self) -> String {
        match self.status {
            AssessmentStatus::Approved => {
                format!("approved with grade {} (total {:.1})", self.grade, self.total)
            }
            AssessmentStatus::Rejected => format!("rejected (total {:.1})", self.total),
        }
    }
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reduce ten normalized grades, in rubric order, to a composite result.
///
/// Individual grades are trusted as produced by the normalizer; only the count is checked.
pub fn score_composite(grades: &[u8]) -> Result<CompositeResult, GradingError> {
    if grades.len() != QUESTION_COUNT {
        return Err(GradingError::WrongQuestionCount {
            expected: QUESTION_COUNT,
            found: grades.len(),
        });
    }

    let weighted: f64 = grades
        .iter()
        .map(|grade| f64::from(*grade) * QUESTION_WEIGHT)
        .sum();

    Ok(classify_total(round_to_tenth(weighted)))
}

/// Classify an already rounded total.
pub fn classify_total(total: f64) -> CompositeResult {
    let (grade, status) = if total.is_nan() || total < PASS_THRESHOLD {
        (0, AssessmentStatus::Rejected)
    } else if total < GOOD_THRESHOLD {
        (3, AssessmentStatus::Approved)
    } else if total < EXCELLENT_THRESHOLD {
        (4, AssessmentStatus::Approved)
    } else {
        (5, AssessmentStatus::Approved)
    };

    CompositeResult {
        grade,
        status,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fives_score_the_maximum() {
        let result = score_composite(&[5; 10]).expect("ten grades");
        assert_eq!(result.total, 110.0);
        assert_eq!(result.status, AssessmentStatus::Approved);
        assert_eq!(result.grade, 5);
    }

    #[test]
    fn all_threes_pass_with_grade_three() {
        let result = score_composite(&[3; 10]).expect("ten grades");
        assert_eq!(result.total, 66.0);
        assert_eq!(result.status, AssessmentStatus::Approved);
        assert_eq!(result.grade, 3);
    }

    #[test]
    fn all_zeros_are_rejected() {
        let result = score_composite(&[0; 10]).expect("ten grades");
        assert_eq!(result.total, 0.0);
        assert_eq!(result.status, AssessmentStatus::Rejected);
        assert_eq!(result.grade, 0);
    }

    #[test]
    fn totals_are_rounded_to_one_decimal() {
        // 27 grade points -> 59.4, one short of passing.
        let result = score_composite(&[3, 3, 3, 3, 3, 3, 3, 2, 2, 2]).expect("ten grades");
        assert_eq!(result.total, 59.4);
        assert_eq!(result.status, AssessmentStatus::Rejected);
        assert_eq!(result.grade, 0);

        let result = score_composite(&[3, 3, 3, 3, 3, 3, 3, 3, 2, 2]).expect("ten grades");
        assert_eq!(result.total, 61.6);
        assert_eq!(result.grade, 3);
    }

    #[test]
    fn rejected_totals_never_carry_a_grade() {
        let result = classify_total(59.9);
        assert_eq!(result.status, AssessmentStatus::Rejected);
        assert_eq!(result.grade, 0);
    }

    #[test]
    fn band_lower_bounds_are_inclusive() {
        assert_eq!(classify_total(60.0).grade, 3);
        assert!(classify_total(60.0).is_approved());
        assert_eq!(classify_total(69.9).grade, 3);
        assert_eq!(classify_total(70.0).grade, 4);
        assert_eq!(classify_total(89.9).grade, 4);
        assert!(classify_total(89.9).is_approved());
        assert_eq!(classify_total(90.0).grade, 5);
    }

    #[test]
    fn nan_totals_are_rejected() {
        assert_eq!(classify_total(f64::NAN).status, AssessmentStatus::Rejected);
    }

    #[test]
    fn wrong_length_is_a_precondition_violation() {
        assert_eq!(
            score_composite(&[5; 11]),
            Err(GradingError::WrongQuestionCount {
                expected: 10,
                found: 11
            })
        );
        assert!(score_composite(&[]).is_err());
    }

    #[test]
    fn scoring_is_repeatable() {
        let grades = [5, 4, 3, 2, 1, 0, 5, 4, 3, 2];
        let first = score_composite(&grades).expect("ten grades");
        let second = score_composite(&grades).expect("ten grades");
        assert_eq!(first, second);
        assert_eq!(first.total.to_bits(), second.total.to_bits());
    }

    #[test]
    fn summary_describes_the_outcome() {
        assert_eq!(
            classify_total(77.0).summary(),
            "approved with grade 4 (total 77.0)"
        );
        assert_eq!(classify_total(12.5).summary(), "rejected (total 12.5)");
    }
}
