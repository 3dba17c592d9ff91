use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::aggregation::aggregate;
use super::domain::{Section, Sector, SectorId};
use super::filter::{FilterResolver, FilterSpec, TallyQuery};
use super::report::views::ReportScope;
use super::report::SurveyReport;
use super::repository::{DataFetchError, ResponseRecorder, SurveyDataStore};
use super::submission::{ResponseSubmission, SubmissionError, SubmissionReceipt};

/// Fetches tallies for a filter and turns them into a [`SurveyReport`].
///
/// Holds no report state of its own: every call returns a fresh value and the
/// caller decides which one is current.
pub struct SurveyReportService<S> {
    store: Arc<S>,
}

impl<S> SurveyReportService<S>
where
    S: SurveyDataStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn build_report(
        &self,
        filter: &FilterSpec,
        today: NaiveDate,
    ) -> Result<SurveyReport, ReportServiceError> {
        let resolved = FilterResolver::new(today).resolve(filter);
        debug!(query = ?resolved.query, period = ?resolved.period.mode, "fetching survey tallies");

        let rows = self
            .store
            .fetch_tallies(&resolved.query)
            .await
            .map_err(|err| {
                warn!(%err, "tally fetch failed");
                err
            })?;

        let outcome = aggregate(rows);
        if !outcome.rejected.is_empty() {
            warn!(
                skipped = outcome.rejected.len(),
                "report built without malformed tally rows"
            );
        }

        let scope = self.scope_for(&resolved.query).await?;
        Ok(SurveyReport::new(resolved.period, scope, outcome))
    }

    /// Sectors sorted by name.
    pub async fn sectors(&self) -> Result<Vec<Sector>, ReportServiceError> {
        let mut sectors = self.store.list_sectors().await?;
        sectors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sectors)
    }

    /// Sections sorted by name, optionally limited to one sector.
    pub async fn sections(
        &self,
        sector_id: Option<&SectorId>,
    ) -> Result<Vec<Section>, ReportServiceError> {
        let mut sections = self.store.list_sections(sector_id).await?;
        if let Some(sector_id) = sector_id {
            sections.retain(|section| &section.sector_id == sector_id);
        }
        sections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sections)
    }

    async fn scope_for(&self, query: &TallyQuery) -> Result<ReportScope, DataFetchError> {
        let mut scope = ReportScope {
            sector_id: query.sector_id.clone(),
            section_id: query.section_id.clone(),
            ..ReportScope::default()
        };

        if let Some(sector_id) = &query.sector_id {
            scope.sector_name = self
                .store
                .list_sectors()
                .await?
                .into_iter()
                .find(|sector| &sector.id == sector_id)
                .map(|sector| sector.name);
        }

        if let Some(section_id) = &query.section_id {
            scope.section_name = self
                .store
                .list_sections(query.sector_id.as_ref())
                .await?
                .into_iter()
                .find(|section| &section.id == section_id)
                .map(|section| section.name);
        }

        Ok(scope)
    }
}

impl<S> SurveyReportService<S>
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    /// Validates a respondent's answers and stores one record per question.
    pub async fn submit(
        &self,
        submission: ResponseSubmission,
        today: NaiveDate,
    ) -> Result<SubmissionReceipt, ReportServiceError> {
        let questions = self.store.list_questions(&submission.sector_id).await?;
        let answers = submission.validate(&questions, today)?;
        let recorded = self.store.record_answers(answers).await?;
        debug!(sector = %submission.sector_id, recorded, "survey response recorded");

        Ok(SubmissionReceipt {
            sector_id: submission.sector_id,
            recorded,
            submitted_on: today,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Fetch(#[from] DataFetchError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
