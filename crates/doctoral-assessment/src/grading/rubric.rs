use serde::{Deserialize, Serialize};

/// Number of questions in every assessment.
pub const QUESTION_COUNT: usize = 10;

/// Raw rating scale attached to a rubric position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingScale {
    /// Rated 1-5; the rating is the grade.
    Direct,
    OutOfTwenty,
    OutOfTen,
    OutOfFifteen,
}

/// Scale per question, keyed by position rather than question text.
pub const RUBRIC: [RatingScale; QUESTION_COUNT] = [
    RatingScale::Direct,
    RatingScale::Direct,
    RatingScale::OutOfTwenty,
    RatingScale::OutOfTen,
    RatingScale::OutOfTwenty,
    RatingScale::OutOfFifteen,
    RatingScale::OutOfTen,
    RatingScale::OutOfTen,
    RatingScale::Direct,
    RatingScale::OutOfTen,
];

const TWENTY_POINT_THRESHOLDS: [(f64, u8); 3] = [(17.0, 5), (14.0, 4), (11.0, 3)];
const TEN_POINT_THRESHOLDS: [(f64, u8); 3] = [(9.0, 5), (7.0, 4), (5.0, 3)];
const FIFTEEN_POINT_THRESHOLDS: [(f64, u8); 3] = [(13.0, 5), (11.0, 4), (9.0, 3)];

/// Grade awarded to any positive rating under the lowest threshold of a banded scale.
const BANDED_FLOOR: u8 = 2;

impl RatingScale {
    pub fn for_question(index: usize) -> Option<Self> {
        RUBRIC.get(index).copied()
    }

    pub const fn max(self) -> u8 {
        match self {
            RatingScale::Direct => 5,
            RatingScale::OutOfTwenty => 20,
            RatingScale::OutOfTen => 10,
            RatingScale::OutOfFifteen => 15,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RatingScale::Direct => "1-5",
            RatingScale::OutOfTwenty => "1-20",
            RatingScale::OutOfTen => "1-10",
            RatingScale::OutOfFifteen => "1-15",
        }
    }

    fn thresholds(self) -> &'static [(f64, u8)] {
        match self {
            RatingScale::Direct => &[],
            RatingScale::OutOfTwenty => &TWENTY_POINT_THRESHOLDS,
            RatingScale::OutOfTen => &TEN_POINT_THRESHOLDS,
            RatingScale::OutOfFifteen => &FIFTEEN_POINT_THRESHOLDS,
        }
    }

    /// Grade for a positive, finite rating on this scale.
    pub(crate) fn grade(self, rating: f64) -> u8 {
        if self == RatingScale::Direct {
            return rating.round().clamp(1.0, 5.0) as u8;
        }

        self.thresholds()
            .iter()
            .find(|(minimum, _)| rating >= *minimum)
            .map(|(_, grade)| *grade)
            .unwrap_or(BANDED_FLOOR)
    }
}
