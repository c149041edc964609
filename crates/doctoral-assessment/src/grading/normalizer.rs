use super::rubric::RatingScale;
use super::GradingError;

/// Map a raw rating to its 0-5 grade for the question at `question_index`.
///
/// Missing, non-positive and non-finite ratings yield 0, as do indices outside the rubric.
pub fn normalize_grade(raw: Option<f64>, question_index: usize) -> u8 {
    let Some(rating) = raw.filter(|value| value.is_finite() && *value > 0.0) else {
        return 0;
    };

    RatingScale::for_question(question_index)
        .map(|scale| scale.grade(rating))
        .unwrap_or(0)
}

/// Strict variant of [`normalize_grade`] that reports out-of-domain input instead of
/// degrading to 0. `None` is still accepted as "not yet rated".
pub fn try_normalize_grade(raw: Option<f64>, question_index: usize) -> Result<u8, GradingError> {
    let scale = RatingScale::for_question(question_index)
        .ok_or(GradingError::UnknownQuestion(question_index))?;

    match raw {
        None => Ok(0),
        Some(rating) if !rating.is_finite() => Err(GradingError::NonFiniteRating {
            question: question_index,
        }),
        Some(rating) if rating < 0.0 || rating > f64::from(scale.max()) => {
            Err(GradingError::RatingOutOfRange {
                question: question_index,
                rating,
                max: scale.max(),
            })
        }
        Some(rating) => Ok(normalize_grade(Some(rating), question_index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECT: [usize; 3] = [0, 1, 8];
    const TWENTY: [usize; 2] = [2, 4];
    const TEN: [usize; 4] = [3, 6, 7, 9];

    #[test]
    fn direct_questions_pass_ratings_through() {
        for question in DIRECT {
            for rating in 1..=5u8 {
                assert_eq!(normalize_grade(Some(f64::from(rating)), question), rating);
            }
        }
    }

    #[test]
    fn direct_questions_round_and_clamp() {
        assert_eq!(normalize_grade(Some(0.5), 0), 1);
        assert_eq!(normalize_grade(Some(0.2), 1), 1);
        assert_eq!(normalize_grade(Some(3.5), 8), 4);
        assert_eq!(normalize_grade(Some(6.0), 0), 5);
    }

    #[test]
    fn twenty_point_questions_use_bands() {
        for question in TWENTY {
            assert_eq!(normalize_grade(Some(20.0), question), 5);
            assert_eq!(normalize_grade(Some(17.0), question), 5);
            assert_eq!(normalize_grade(Some(16.0), question), 4);
            assert_eq!(normalize_grade(Some(14.0), question), 4);
            assert_eq!(normalize_grade(Some(11.0), question), 3);
            assert_eq!(normalize_grade(Some(10.0), question), 2);
            assert_eq!(normalize_grade(Some(1.0), question), 2);
        }
    }

    #[test]
    fn ten_point_questions_use_bands() {
        for question in TEN {
            assert_eq!(normalize_grade(Some(9.0), question), 5);
            assert_eq!(normalize_grade(Some(8.0), question), 4);
            assert_eq!(normalize_grade(Some(7.0), question), 4);
            assert_eq!(normalize_grade(Some(5.0), question), 3);
            assert_eq!(normalize_grade(Some(4.0), question), 2);
        }
    }

    #[test]
    fn fifteen_point_question_uses_bands() {
        assert_eq!(normalize_grade(Some(13.0), 5), 5);
        assert_eq!(normalize_grade(Some(12.0), 5), 4);
        assert_eq!(normalize_grade(Some(9.0), 5), 3);
        assert_eq!(normalize_grade(Some(8.0), 5), 2);
    }

    #[test]
    fn banded_scales_never_drop_below_two_for_positive_ratings() {
        assert_eq!(normalize_grade(Some(0.1), 2), 2);
        assert_eq!(normalize_grade(Some(0.1), 3), 2);
        assert_eq!(normalize_grade(Some(0.1), 5), 2);
    }

    #[test]
    fn unrated_and_zero_ratings_yield_zero() {
        for question in 0..10 {
            assert_eq!(normalize_grade(Some(0.0), question), 0);
            assert_eq!(normalize_grade(None, question), 0);
            assert_eq!(normalize_grade(Some(-3.0), question), 0);
            assert_eq!(normalize_grade(Some(f64::NAN), question), 0);
        }
    }

    #[test]
    fn unknown_questions_contribute_nothing() {
        assert_eq!(normalize_grade(Some(5.0), 10), 0);
        assert_eq!(normalize_grade(Some(5.0), usize::MAX), 0);
    }

    #[test]
    fn strict_normalization_reports_domain_errors() {
        assert_eq!(try_normalize_grade(Some(18.0), 2), Ok(5));
        assert_eq!(try_normalize_grade(None, 4), Ok(0));
        assert_eq!(
            try_normalize_grade(Some(3.0), 10),
            Err(GradingError::UnknownQuestion(10))
        );
        assert_eq!(
            try_normalize_grade(Some(f64::INFINITY), 0),
            Err(GradingError::NonFiniteRating { question: 0 })
        );
        assert_eq!(
            try_normalize_grade(Some(11.0), 3),
            Err(GradingError::RatingOutOfRange {
                question: 3,
                rating: 11.0,
                max: 10
            })
        );
        assert!(matches!(
            try_normalize_grade(Some(-1.0), 5),
            Err(GradingError::RatingOutOfRange { max: 15, .. })
        ));
    }
}
