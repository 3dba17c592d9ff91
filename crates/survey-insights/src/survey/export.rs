//! CSV export of the tabular report view.

use super::rating::RatingOption;
use super::report::views::QuestionRow;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    code: &'a str,
    question: &'a str,
    very_good: u64,
    good: u64,
    neutral: u64,
    bad: u64,
    very_bad: u64,
    total: u64,
    satisfaction_pct: String,
}

impl<'a> From<&'a QuestionRow> for CsvRow<'a> {
    fn from(row: &'a QuestionRow) -> Self {
        Self {
            code: &row.code,
            question: &row.question,
            very_good: row.count(RatingOption::VeryGood),
            good: row.count(RatingOption::Good),
            neutral: row.count(RatingOption::Neutral),
            bad: row.count(RatingOption::Bad),
            very_bad: row.count(RatingOption::VeryBad),
            total: row.total,
            satisfaction_pct: format!("{:.1}", row.satisfaction_pct),
        }
    }
}

pub fn write_table_csv<W: Write>(rows: &[QuestionRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(CsvRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn table_csv(rows: &[QuestionRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_table_csv(rows, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
