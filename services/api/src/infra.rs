use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use survey_insights::survey::{
    AnswerRecord, DataFetchError, PeriodMode, Question, RatingOption, RawTally,
    ResponseRecorder, Section, Sector, SectorId, SurveyDataStore, SurveyDataset, TallyQuery,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Answer-level store that tallies on read, standing in for the SQL backend.
#[derive(Default, Clone)]
pub(crate) struct InMemorySurveyStore {
    dataset: Arc<Mutex<SurveyDataset>>,
}

impl InMemorySurveyStore {
    pub(crate) fn from_dataset(dataset: SurveyDataset) -> Self {
        Self {
            dataset: Arc::new(Mutex::new(dataset)),
        }
    }

    pub(crate) fn answer_count(&self) -> usize {
        self.dataset.lock().map(|guard| guard.answers.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SurveyDataset>, DataFetchError> {
        self.dataset
            .lock()
            .map_err(|_| DataFetchError::Unavailable("survey store mutex poisoned".to_string()))
    }
}

fn matches(query: &TallyQuery, answer: &AnswerRecord) -> bool {
    let sector = query
        .sector_id
        .as_ref()
        .map_or(true, |id| id == &answer.sector_id);
    let section = query
        .section_id
        .as_ref()
        .map_or(true, |id| answer.section_id.as_ref() == Some(id));
    let start = query
        .start_date
        .map_or(true, |start| answer.submitted_on >= start);
    let end = query.end_date.map_or(true, |end| answer.submitted_on <= end);
    sector && section && start && end
}

#[async_trait]
impl SurveyDataStore for InMemorySurveyStore {
    async fn fetch_tallies(&self, query: &TallyQuery) -> Result<Vec<RawTally>, DataFetchError> {
        let guard = self.lock()?;

        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<(&str, RatingOption), i64> = HashMap::new();
        for answer in guard.answers.iter().filter(|answer| matches(query, answer)) {
            if !order.contains(&answer.question.as_str()) {
                order.push(answer.question.as_str());
            }
            *counts
                .entry((answer.question.as_str(), answer.option))
                .or_default() += 1;
        }

        let mut rows = Vec::new();
        for question in order {
            for option in RatingOption::display_order() {
                if let Some(count) = counts.get(&(question, option)) {
                    rows.push(RawTally::new(question, option.label(), *count));
                }
            }
        }
        Ok(rows)
    }

    async fn list_sectors(&self) -> Result<Vec<Sector>, DataFetchError> {
        Ok(self.lock()?.sectors.clone())
    }

    async fn list_sections(
        &self,
        sector_id: Option<&SectorId>,
    ) -> Result<Vec<Section>, DataFetchError> {
        Ok(self
            .lock()?
            .sections
            .iter()
            .filter(|section| sector_id.map_or(true, |id| &section.sector_id == id))
            .cloned()
            .collect())
    }

    async fn list_questions(&self, sector_id: &SectorId) -> Result<Vec<Question>, DataFetchError> {
        Ok(self
            .lock()?
            .questions
            .iter()
            .filter(|question| &question.sector_id == sector_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResponseRecorder for InMemorySurveyStore {
    async fn record_answers(&self, answers: Vec<AnswerRecord>) -> Result<usize, DataFetchError> {
        let mut guard = self.lock()?;
        let recorded = answers.len();
        guard.answers.extend(answers);
        Ok(recorded)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_period(raw: &str) -> Result<PeriodMode, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "all" | "all_time" => Ok(PeriodMode::AllTime),
        "week" | "last_week" => Ok(PeriodMode::LastWeek),
        "month" | "last_month" => Ok(PeriodMode::LastMonth),
        "custom" => Ok(PeriodMode::Custom),
        _ => Err(format!(
            "unknown period '{raw}' (expected all-time, last-week, last-month or custom)"
        )),
    }
}
