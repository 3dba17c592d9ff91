//! Validation of a respondent's answers before they are stored.

use super::domain::{AnswerRecord, Question, QuestionId, SectionId, SectorId};
use super::rating::{numeric_to_category, InvalidRatingError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value the form sends for a question the respondent skipped.
pub const UNANSWERED: i64 = 0;

/// Answers as posted by the public survey form: question id to a 1..=5 value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSubmission {
    pub sector_id: SectorId,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    pub ratings: BTreeMap<QuestionId, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub sector_id: SectorId,
    pub recorded: usize,
    pub submitted_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("sector {0} has no survey questions")]
    EmptySurvey(SectorId),
    #[error("question {0} is not part of this survey")]
    UnknownQuestion(QuestionId),
    #[error("please answer every question ({} unanswered)", .0.len())]
    Unanswered(Vec<String>),
    #[error("invalid rating for '{question}': {source}")]
    InvalidRating {
        question: String,
        #[source]
        source: InvalidRatingError,
    },
}

impl ResponseSubmission {
    /// Checks the submission against the sector's questions and decodes every
    /// rating. Returns one record per question, in survey order.
    pub fn validate(
        &self,
        questions: &[Question],
        submitted_on: NaiveDate,
    ) -> Result<Vec<AnswerRecord>, SubmissionError> {
        if questions.is_empty() {
            return Err(SubmissionError::EmptySurvey(self.sector_id.clone()));
        }

        if let Some(unknown) = self
            .ratings
            .keys()
            .find(|id| !questions.iter().any(|question| &question.id == *id))
        {
            return Err(SubmissionError::UnknownQuestion(unknown.clone()));
        }

        let unanswered: Vec<String> = questions
            .iter()
            .filter(|question| {
                self.ratings
                    .get(&question.id)
                    .map_or(true, |value| *value == UNANSWERED)
            })
            .map(|question| question.label.clone())
            .collect();
        if !unanswered.is_empty() {
            return Err(SubmissionError::Unanswered(unanswered));
        }

        questions
            .iter()
            .map(|question| {
                let value = self.ratings.get(&question.id).copied().unwrap_or(UNANSWERED);
                let option =
                    numeric_to_category(value).map_err(|source| SubmissionError::InvalidRating {
                        question: question.label.clone(),
                        source,
                    })?;
                Ok(AnswerRecord {
                    sector_id: self.sector_id.clone(),
                    section_id: self.section_id.clone(),
                    question: question.label.clone(),
                    option,
                    submitted_on,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::rating::RatingOption;

    fn sector() -> SectorId {
        SectorId("north".to_string())
    }

    fn questions() -> Vec<Question> {
        ["Courtesy", "Wait time"]
            .iter()
            .enumerate()
            .map(|(index, label)| Question {
                id: QuestionId(format!("q{}", index + 1)),
                label: label.to_string(),
                sector_id: sector(),
            })
            .collect()
    }

    fn submission(ratings: &[(&str, i64)]) -> ResponseSubmission {
        ResponseSubmission {
            sector_id: sector(),
            section_id: Some(SectionId("intake".to_string())),
            ratings: ratings
                .iter()
                .map(|(id, value)| (QuestionId(id.to_string()), *value))
                .collect(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date")
    }

    #[test]
    fn complete_submission_decodes_every_rating() {
        let records = submission(&[("q1", 5), ("q2", 2)])
            .validate(&questions(), today())
            .expect("valid submission");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "Courtesy");
        assert_eq!(records[0].option, RatingOption::VeryGood);
        assert_eq!(records[1].option, RatingOption::Bad);
        assert_eq!(records[1].submitted_on, today());
        assert_eq!(records[1].section_id, Some(SectionId("intake".to_string())));
    }

    #[test]
    fn skipped_questions_are_reported_by_label() {
        let err = submission(&[("q1", 4), ("q2", UNANSWERED)])
            .validate(&questions(), today())
            .expect_err("unanswered");
        assert_eq!(err, SubmissionError::Unanswered(vec!["Wait time".to_string()]));

        let err = submission(&[("q1", 4)])
            .validate(&questions(), today())
            .expect_err("missing");
        assert!(matches!(err, SubmissionError::Unanswered(labels) if labels.len() == 1));
    }

    #[test]
    fn out_of_scale_values_surface_the_rating_error() {
        let err = submission(&[("q1", 4), ("q2", 9)])
            .validate(&questions(), today())
            .expect_err("invalid rating");
        assert_eq!(
            err,
            SubmissionError::InvalidRating {
                question: "Wait time".to_string(),
                source: InvalidRatingError::OutOfRange(9),
            }
        );
    }

    #[test]
    fn unknown_question_ids_are_rejected() {
        let err = submission(&[("q1", 4), ("q2", 4), ("q9", 1)])
            .validate(&questions(), today())
            .expect_err("unknown question");
        assert_eq!(err, SubmissionError::UnknownQuestion(QuestionId("q9".to_string())));
    }

    #[test]
    fn sectors_without_questions_cannot_be_answered() {
        let err = submission(&[])
            .validate(&[], today())
            .expect_err("empty survey");
        assert!(matches!(err, SubmissionError::EmptySurvey(_)));
    }
}
