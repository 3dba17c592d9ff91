use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::SectorId;
use super::export::table_csv;
use super::filter::{local_today, FilterSpec};
use super::report::views::{QuestionDetailView, SurveyReportView};
use super::repository::{DataFetchError, ResponseRecorder, SurveyDataStore};
use super::service::{ReportServiceError, SurveyReportService};
use super::submission::ResponseSubmission;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub filter: FilterSpec,
    #[serde(default)]
    pub today: Option<NaiveDate>,
    /// Question to include a drill-down for.
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: SurveyReportView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_detail: Option<QuestionDetailView>,
}

#[derive(Debug, Deserialize)]
pub struct SectionsQuery {
    #[serde(default)]
    pub sector_id: Option<SectorId>,
}

/// Router exposing catalog lookups, reports, exports and response intake.
pub fn survey_router<S>(service: Arc<SurveyReportService<S>>) -> Router
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    Router::new()
        .route("/api/v1/sectors", get(sectors_handler::<S>))
        .route("/api/v1/sections", get(sections_handler::<S>))
        .route("/api/v1/reports", post(report_handler::<S>))
        .route("/api/v1/reports/export", post(export_handler::<S>))
        .route("/api/v1/responses", post(submit_handler::<S>))
        .with_state(service)
}

pub(crate) async fn sectors_handler<S>(
    State(service): State<Arc<SurveyReportService<S>>>,
) -> Response
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    match service.sectors().await {
        Ok(sectors) => (StatusCode::OK, Json(sectors)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sections_handler<S>(
    State(service): State<Arc<SurveyReportService<S>>>,
    Query(query): Query<SectionsQuery>,
) -> Response
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    match service.sections(query.sector_id.as_ref()).await {
        Ok(sections) => (StatusCode::OK, Json(sections)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<SurveyReportService<S>>>,
    Json(request): Json<ReportRequest>,
) -> Response
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    let today = request.today.unwrap_or_else(local_today);
    match service.build_report(&request.filter, today).await {
        Ok(report) => {
            let question_detail = request
                .question
                .as_deref()
                .and_then(|question| report.question_detail(question));
            let body = ReportResponse {
                report: report.view(),
                question_detail,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<SurveyReportService<S>>>,
    Json(request): Json<ReportRequest>,
) -> Response
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    let today = request.today.unwrap_or_else(local_today);
    let report = match service.build_report(&request.filter, today).await {
        Ok(report) => report,
        Err(err) => return error_response(err),
    };

    match table_csv(&report.table()) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"survey-report.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<SurveyReportService<S>>>,
    Json(submission): Json<ResponseSubmission>,
) -> Response
where
    S: SurveyDataStore + ResponseRecorder + 'static,
{
    let today = local_today();
    match service.submit(submission, today).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReportServiceError) -> Response {
    let status = match &err {
        ReportServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportServiceError::Fetch(DataFetchError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        ReportServiceError::Fetch(DataFetchError::Malformed(_)) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
