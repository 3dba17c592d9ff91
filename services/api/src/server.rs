use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySurveyStore};
use crate::routes::with_survey_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use survey_insights::config::AppConfig;
use survey_insights::error::AppError;
use survey_insights::survey::{AnswerImporter, SurveyDataset, SurveyReportService};
use survey_insights::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data) = args.data.take() {
        config.data.seed_path = Some(data);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = match &config.data.seed_path {
        Some(path) => AnswerImporter::from_path(path)?,
        None => SurveyDataset::default(),
    };
    info!(
        answers = dataset.answers.len(),
        sectors = dataset.sectors.len(),
        seed = ?config.data.seed_path,
        "survey store seeded"
    );
    let store = Arc::new(InMemorySurveyStore::from_dataset(dataset));
    let report_service = Arc::new(SurveyReportService::new(store));

    let app = with_survey_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "survey insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
