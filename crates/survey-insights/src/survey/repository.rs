use async_trait::async_trait;

use super::domain::{AnswerRecord, Question, RawTally, Section, Sector, SectorId};
use super::filter::TallyQuery;

/// Read side of the persistence collaborator.
#[async_trait]
pub trait SurveyDataStore: Send + Sync {
    /// Pre-aggregated tally rows matching the query; `None` fields are unbounded.
    async fn fetch_tallies(&self, query: &TallyQuery) -> Result<Vec<RawTally>, DataFetchError>;

    async fn list_sectors(&self) -> Result<Vec<Sector>, DataFetchError>;

    /// Sections of one sector, or of every sector when `sector_id` is `None`.
    async fn list_sections(
        &self,
        sector_id: Option<&SectorId>,
    ) -> Result<Vec<Section>, DataFetchError>;

    async fn list_questions(&self, sector_id: &SectorId) -> Result<Vec<Question>, DataFetchError>;
}

/// Write side used when a respondent submits a survey.
#[async_trait]
pub trait ResponseRecorder: Send + Sync {
    async fn record_answers(&self, answers: Vec<AnswerRecord>) -> Result<usize, DataFetchError>;
}

/// Failure talking to the data store. Never retried by the report service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataFetchError {
    #[error("data store unavailable: {0}")]
    Unavailable(String),
    #[error("data store returned malformed data: {0}")]
    Malformed(String),
}
