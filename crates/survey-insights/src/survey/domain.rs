use super::rating::RatingOption;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for sectors (the organisational unit being rated).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub String);

/// Identifier wrapper for sections inside a sector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

/// Identifier wrapper for survey questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub sector_id: SectorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub label: String,
    pub sector_id: SectorId,
}

/// Tally row exactly as the data store returns it, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTally {
    pub question: String,
    pub option: String,
    pub count: i64,
}

impl RawTally {
    pub fn new(question: impl Into<String>, option: impl Into<String>, count: i64) -> Self {
        Self {
            question: question.into(),
            option: option.into(),
            count,
        }
    }
}

/// Pre-aggregated count of responses for one question and rating option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseTally {
    pub question: String,
    pub option: RatingOption,
    pub count: u64,
}

impl ResponseTally {
    pub fn new(question: impl Into<String>, option: RatingOption, count: u64) -> Self {
        Self {
            question: question.into(),
            option,
            count,
        }
    }
}

/// Reason a raw row was kept out of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TallyRejection {
    #[error("unknown rating option '{option}' for question '{question}'")]
    UnknownOption { question: String, option: String },
    #[error("negative count {count} for question '{question}'")]
    NegativeCount { question: String, count: i64 },
}

impl TryFrom<RawTally> for ResponseTally {
    type Error = TallyRejection;

    fn try_from(row: RawTally) -> Result<Self, Self::Error> {
        let Some(option) = RatingOption::from_label(&row.option) else {
            return Err(TallyRejection::UnknownOption {
                question: row.question,
                option: row.option,
            });
        };

        if row.count < 0 {
            return Err(TallyRejection::NegativeCount {
                question: row.question,
                count: row.count,
            });
        }

        Ok(Self {
            question: row.question,
            option,
            count: row.count as u64,
        })
    }
}

/// A single stored answer: one respondent rating one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub sector_id: SectorId,
    pub section_id: Option<SectionId>,
    pub question: String,
    pub option: RatingOption,
    pub submitted_on: NaiveDate,
}
