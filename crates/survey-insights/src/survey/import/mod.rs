//! Loads stored answer records from a CSV export.

mod parser;

use super::domain::{AnswerRecord, Question, QuestionId, Section, SectionId, Sector, SectorId};
use super::rating::InvalidRatingError;
use parser::{ImportedAnswer, RowError};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum AnswerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Rating { line: u64, source: InvalidRatingError },
    Date { line: u64, value: String },
}

impl std::fmt::Display for AnswerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerImportError::Io(err) => write!(f, "failed to read answer export: {}", err),
            AnswerImportError::Csv(err) => write!(f, "invalid answer CSV data: {}", err),
            AnswerImportError::Rating { line, source } => {
                write!(f, "line {}: {}", line, source)
            }
            AnswerImportError::Date { line, value } => {
                write!(f, "line {}: '{}' is not a YYYY-MM-DD date", line, value)
            }
        }
    }
}

impl std::error::Error for AnswerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnswerImportError::Io(err) => Some(err),
            AnswerImportError::Csv(err) => Some(err),
            AnswerImportError::Rating { source, .. } => Some(source),
            AnswerImportError::Date { .. } => None,
        }
    }
}

impl From<std::io::Error> for AnswerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RowError> for AnswerImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Rating { line, source } => Self::Rating { line, source },
            RowError::Date { line, value } => Self::Date { line, value },
        }
    }
}

/// Answers plus the sector, section and question catalog they reference.
#[derive(Debug, Clone, Default)]
pub struct SurveyDataset {
    pub answers: Vec<AnswerRecord>,
    pub sectors: Vec<Sector>,
    pub sections: Vec<Section>,
    pub questions: Vec<Question>,
}

impl SurveyDataset {
    fn from_imported(rows: Vec<ImportedAnswer>) -> Self {
        let mut dataset = Self::default();
        let mut seen_sectors = HashSet::new();
        let mut seen_sections = HashSet::new();
        let mut seen_questions = HashSet::new();

        for row in rows {
            let sector_id = SectorId(row.sector_id);
            if seen_sectors.insert(sector_id.clone()) {
                dataset.sectors.push(Sector {
                    id: sector_id.clone(),
                    name: row.sector_name.unwrap_or_else(|| sector_id.0.clone()),
                });
            }

            let section_id = row.section_id.map(SectionId);
            if let Some(id) = &section_id {
                if seen_sections.insert((sector_id.clone(), id.clone())) {
                    dataset.sections.push(Section {
                        id: id.clone(),
                        name: row.section_name.unwrap_or_else(|| id.0.clone()),
                        sector_id: sector_id.clone(),
                    });
                }
            }

            if seen_questions.insert((sector_id.clone(), row.question.clone())) {
                let ordinal = dataset
                    .questions
                    .iter()
                    .filter(|question| question.sector_id == sector_id)
                    .count()
                    + 1;
                dataset.questions.push(Question {
                    id: QuestionId(format!("{}-q{}", sector_id.0, ordinal)),
                    label: row.question.clone(),
                    sector_id: sector_id.clone(),
                });
            }

            dataset.answers.push(AnswerRecord {
                sector_id,
                section_id,
                question: row.question,
                option: row.option,
                submitted_on: row.submitted_on,
            });
        }

        dataset
    }
}

pub struct AnswerImporter;

impl AnswerImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SurveyDataset, AnswerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Expected columns: `sector_id`, `question`, `option` (label or 1-5),
    /// `submitted_on`, plus optional `sector_name`, `section_id`, `section_name`.
    pub fn from_reader<R: Read>(reader: R) -> Result<SurveyDataset, AnswerImportError> {
        let rows = parser::parse_records(reader)?;
        Ok(SurveyDataset::from_imported(rows))
    }
}
