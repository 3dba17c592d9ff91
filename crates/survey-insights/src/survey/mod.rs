//! Satisfaction-survey aggregation, metrics and executive summaries.

pub mod aggregation;
pub mod domain;
pub mod export;
pub mod filter;
pub mod import;
pub mod rating;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod submission;

#[cfg(test)]
mod tests;

pub use aggregation::{aggregate, AggregatedReport, AggregationOutcome, QuestionDistribution};
pub use domain::{
    AnswerRecord, Question, QuestionId, RawTally, ResponseTally, Section, SectionId, Sector,
    SectorId, TallyRejection,
};
pub use filter::{
    local_today, DateRange, FilterError, FilterResolver, FilterSpec, PeriodMode,
    ResolvedFilter, ResolvedPeriod, SectionSelection, TallyQuery,
};
pub use import::{AnswerImportError, AnswerImporter, SurveyDataset};
pub use rating::{all_categories, numeric_to_category, InvalidRatingError, RatingOption};
pub use report::{executive_summary, SurveyReport};
pub use repository::{DataFetchError, ResponseRecorder, SurveyDataStore};
pub use router::survey_router;
pub use service::{ReportServiceError, SurveyReportService};
pub use submission::{ResponseSubmission, SubmissionError, SubmissionReceipt};
