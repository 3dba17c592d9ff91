use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::survey::domain::{
    AnswerRecord, Question, QuestionId, RawTally, Section, SectionId, Sector, SectorId,
};
use crate::survey::filter::TallyQuery;
use crate::survey::repository::{DataFetchError, ResponseRecorder, SurveyDataStore};
use crate::survey::submission::ResponseSubmission;
use crate::survey::{survey_router, SurveyReportService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn north() -> SectorId {
    SectorId("north".to_string())
}

/// Courtesy: 8 of 10 positive. Wait time: 6 of 10 negative. One row with an
/// option label the scale does not know.
pub(super) fn tally_rows() -> Vec<RawTally> {
    vec![
        RawTally::new("Courtesy", "Very good", 6),
        RawTally::new("Courtesy", "Good", 2),
        RawTally::new("Courtesy", "Neutral", 1),
        RawTally::new("Courtesy", "Bad", 1),
        RawTally::new("Courtesy", "Very bad", 0),
        RawTally::new("Wait time", "Very good", 1),
        RawTally::new("Wait time", "Good", 1),
        RawTally::new("Wait time", "Neutral", 2),
        RawTally::new("Wait time", "Bad", 3),
        RawTally::new("Wait time", "Very bad", 3),
        RawTally::new("Wait time", "Excellent", 4),
    ]
}

#[derive(Clone)]
pub(super) struct StaticStore {
    pub(super) rows: Vec<RawTally>,
    pub(super) queries: Arc<Mutex<Vec<TallyQuery>>>,
    pub(super) recorded: Arc<Mutex<Vec<AnswerRecord>>>,
}

impl Default for StaticStore {
    fn default() -> Self {
        Self {
            rows: tally_rows(),
            queries: Arc::default(),
            recorded: Arc::default(),
        }
    }
}

impl StaticStore {
    pub(super) fn queries(&self) -> Vec<TallyQuery> {
        self.queries.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn recorded(&self) -> Vec<AnswerRecord> {
        self.recorded.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl SurveyDataStore for StaticStore {
    async fn fetch_tallies(&self, query: &TallyQuery) -> Result<Vec<RawTally>, DataFetchError> {
        self.queries
            .lock()
            .expect("store mutex poisoned")
            .push(query.clone());
        Ok(self.rows.clone())
    }

    async fn list_sectors(&self) -> Result<Vec<Sector>, DataFetchError> {
        Ok(vec![
            Sector {
                id: SectorId("south".to_string()),
                name: "South Clinic".to_string(),
            },
            Sector {
                id: north(),
                name: "North Station".to_string(),
            },
        ])
    }

    async fn list_sections(
        &self,
        _sector_id: Option<&SectorId>,
    ) -> Result<Vec<Section>, DataFetchError> {
        Ok(vec![
            Section {
                id: SectionId("records".to_string()),
                name: "Records".to_string(),
                sector_id: north(),
            },
            Section {
                id: SectionId("intake".to_string()),
                name: "Intake Desk".to_string(),
                sector_id: north(),
            },
            Section {
                id: SectionId("triage".to_string()),
                name: "Triage".to_string(),
                sector_id: SectorId("south".to_string()),
            },
        ])
    }

    async fn list_questions(&self, sector_id: &SectorId) -> Result<Vec<Question>, DataFetchError> {
        if sector_id != &north() {
            return Ok(Vec::new());
        }
        Ok(["Courtesy", "Wait time"]
            .iter()
            .enumerate()
            .map(|(index, label)| Question {
                id: QuestionId(format!("q{}", index + 1)),
                label: label.to_string(),
                sector_id: north(),
            })
            .collect())
    }
}

#[async_trait]
impl ResponseRecorder for StaticStore {
    async fn record_answers(&self, answers: Vec<AnswerRecord>) -> Result<usize, DataFetchError> {
        let count = answers.len();
        self.recorded
            .lock()
            .expect("store mutex poisoned")
            .extend(answers);
        Ok(count)
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl SurveyDataStore for UnavailableStore {
    async fn fetch_tallies(&self, _query: &TallyQuery) -> Result<Vec<RawTally>, DataFetchError> {
        Err(DataFetchError::Unavailable("connection refused".to_string()))
    }

    async fn list_sectors(&self) -> Result<Vec<Sector>, DataFetchError> {
        Err(DataFetchError::Unavailable("connection refused".to_string()))
    }

    async fn list_sections(
        &self,
        _sector_id: Option<&SectorId>,
    ) -> Result<Vec<Section>, DataFetchError> {
        Err(DataFetchError::Unavailable("connection refused".to_string()))
    }

    async fn list_questions(&self, _sector_id: &SectorId) -> Result<Vec<Question>, DataFetchError> {
        Err(DataFetchError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl ResponseRecorder for UnavailableStore {
    async fn record_answers(&self, _answers: Vec<AnswerRecord>) -> Result<usize, DataFetchError> {
        Err(DataFetchError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn build_service() -> (SurveyReportService<StaticStore>, StaticStore) {
    let store = StaticStore::default();
    let service = SurveyReportService::new(Arc::new(store.clone()));
    (service, store)
}

pub(super) fn router_with_store(store: StaticStore) -> axum::Router {
    survey_router(Arc::new(SurveyReportService::new(Arc::new(store))))
}

pub(super) fn submission(ratings: &[(&str, i64)]) -> ResponseSubmission {
    ResponseSubmission {
        sector_id: north(),
        section_id: Some(SectionId("intake".to_string())),
        ratings: ratings
            .iter()
            .map(|(id, value)| (QuestionId(id.to_string()), *value))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
