//! The closed five-point satisfaction scale shared by submission and reporting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five ordered answers a respondent can give.
///
/// Ordering only matters for scale-position logic such as decoding a submitted
/// numeric value; aggregation treats the options as plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingOption {
    VeryBad,
    Bad,
    Neutral,
    Good,
    VeryGood,
}

/// Whether an option counts toward satisfaction, dissatisfaction, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPolarity {
    Negative,
    Neutral,
    Positive,
}

impl RatingOption {
    pub const COUNT: usize = 5;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::VeryBad,
            Self::Bad,
            Self::Neutral,
            Self::Good,
            Self::VeryGood,
        ]
    }

    /// Display order used by tables and charts, best answer first.
    pub const fn display_order() -> [Self; Self::COUNT] {
        [
            Self::VeryGood,
            Self::Good,
            Self::Neutral,
            Self::Bad,
            Self::VeryBad,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryBad => "Very bad",
            Self::Bad => "Bad",
            Self::Neutral => "Neutral",
            Self::Good => "Good",
            Self::VeryGood => "Very good",
        }
    }

    pub const fn score(self) -> u8 {
        match self {
            Self::VeryBad => 1,
            Self::Bad => 2,
            Self::Neutral => 3,
            Self::Good => 4,
            Self::VeryGood => 5,
        }
    }

    pub const fn polarity(self) -> RatingPolarity {
        match self {
            Self::VeryBad | Self::Bad => RatingPolarity::Negative,
            Self::Neutral => RatingPolarity::Neutral,
            Self::Good | Self::VeryGood => RatingPolarity::Positive,
        }
    }

    /// Chart color for the option. Fixed so exported charts are reproducible.
    pub const fn color(self) -> &'static str {
        match self {
            Self::VeryGood => "#4CAF50",
            Self::Good => "#2196F3",
            Self::Neutral => "#FFC107",
            Self::Bad => "#FF9933",
            Self::VeryBad => "#F44336",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.score() as usize - 1
    }

    /// Decodes the numeric value a respondent submits.
    pub fn from_score(value: i64) -> Result<Self, InvalidRatingError> {
        match value {
            1 => Ok(Self::VeryBad),
            2 => Ok(Self::Bad),
            3 => Ok(Self::Neutral),
            4 => Ok(Self::Good),
            5 => Ok(Self::VeryGood),
            other => Err(InvalidRatingError::OutOfRange(other)),
        }
    }

    /// Matches a stored option label. Accepts the canonical English labels, the
    /// snake_case identifiers, and the Spanish labels the survey forms were
    /// first published with.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace(['_', '-'], " ");
        let option = match normalized.as_str() {
            "very bad" | "muy malo" => Self::VeryBad,
            "bad" | "malo" => Self::Bad,
            "neutral" | "regular" => Self::Neutral,
            "good" | "bueno" => Self::Good,
            "very good" | "muy bueno" => Self::VeryGood,
            _ => return None,
        };
        Some(option)
    }
}

/// All five options in scale order, worst first.
pub const fn all_categories() -> [RatingOption; RatingOption::COUNT] {
    RatingOption::ordered()
}

/// Maps a submitted 1..=5 value to its option.
pub fn numeric_to_category(value: i64) -> Result<RatingOption, InvalidRatingError> {
    RatingOption::from_score(value)
}

impl fmt::Display for RatingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RatingOption {
    type Err = InvalidRatingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(option) = Self::from_label(raw) {
            return Ok(option);
        }

        match raw.trim().parse::<i64>() {
            Ok(value) => Self::from_score(value),
            Err(_) => Err(InvalidRatingError::UnknownLabel(raw.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRatingError {
    #[error("rating {0} is outside the 1-5 scale")]
    OutOfRange(i64),
    #[error("'{0}' is not a recognised rating option")]
    UnknownLabel(String),
}
