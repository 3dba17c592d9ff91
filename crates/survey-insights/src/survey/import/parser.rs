use crate::survey::rating::{InvalidRatingError, RatingOption};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ImportedAnswer {
    pub(crate) sector_id: String,
    pub(crate) sector_name: Option<String>,
    pub(crate) section_id: Option<String>,
    pub(crate) section_name: Option<String>,
    pub(crate) question: String,
    pub(crate) option: RatingOption,
    pub(crate) submitted_on: NaiveDate,
}

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Rating { line: u64, source: InvalidRatingError },
    Date { line: u64, value: String },
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ImportedAnswer>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<AnswerRow>() {
        let row = record.map_err(RowError::Csv)?;
        // Header is line 1.
        let line = records.len() as u64 + 2;

        let option = row
            .option
            .parse::<RatingOption>()
            .map_err(|source| RowError::Rating { line, source })?;
        let submitted_on = parse_date(&row.submitted_on).ok_or_else(|| RowError::Date {
            line,
            value: row.submitted_on.clone(),
        })?;

        records.push(ImportedAnswer {
            sector_id: row.sector_id,
            sector_name: row.sector_name,
            section_id: row.section_id,
            section_name: row.section_name,
            question: row.question,
            option,
            submitted_on,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    sector_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sector_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    section_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    section_name: Option<String>,
    question: String,
    option: String,
    submitted_on: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc().date())
}
