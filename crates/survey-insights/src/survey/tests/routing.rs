use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::survey::filter::local_today;
use crate::survey::router::sectors_handler;
use crate::survey::SurveyReportService;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn report_route_returns_the_dashboard_view() {
    let router = router_with_store(StaticStore::default());

    let response = router
        .oneshot(post_json(
            "/api/v1/reports",
            json!({
                "filter": { "sector_id": "north", "period": "all_time" },
                "today": "2024-03-31",
                "question": "Wait time"
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["summary"]["overall_satisfaction"], json!(50.0));
    assert_eq!(body["scope_label"], json!("North Station"));
    assert_eq!(body["period_label"], json!("All time"));
    assert_eq!(body["table"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["question_detail"]["critical_improvement"], json!(true));
    assert_eq!(body["skipped_rows"][0]["reason"], json!("unknown_option"));
}

#[tokio::test]
async fn reports_without_a_pinned_date_resolve_against_the_local_clock() {
    let router = router_with_store(StaticStore::default());
    let before = local_today();

    let response = router
        .oneshot(post_json(
            "/api/v1/reports",
            json!({ "filter": { "period": "last_week" } }),
        ))
        .await
        .expect("router responds");

    let after = local_today();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let end = body["period"]["range"]["end"].as_str().expect("resolved end date");
    assert!(end == before.to_string() || end == after.to_string());
}

#[tokio::test]
async fn custom_period_without_dates_is_rejected() {
    let router = router_with_store(StaticStore::default());

    let response = router
        .oneshot(post_json(
            "/api/v1/reports",
            json!({ "filter": { "period": "custom", "start_date": "2024-03-01" } }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn export_route_streams_csv() {
    let router = router_with_store(StaticStore::default());

    let response = router
        .oneshot(post_json(
            "/api/v1/reports/export",
            json!({ "filter": { "period": "all_time" }, "today": "2024-03-31" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some("text/csv; charset=utf-8".as_bytes())
    );
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    let text = String::from_utf8(body.to_vec()).expect("utf-8 csv");
    assert!(text.starts_with("code,question,very_good"));
    assert!(text.contains("Q2,Wait time,1,1,2,3,3,10,20.0"));
}

#[tokio::test]
async fn responses_route_returns_created() {
    let store = StaticStore::default();
    let router = router_with_store(store.clone());

    let response = router
        .oneshot(post_json(
            "/api/v1/responses",
            serde_json::to_value(submission(&[("q1", 4), ("q2", 3)])).expect("serializes"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["recorded"], json!(2));
    assert_eq!(store.recorded().len(), 2);
}

#[tokio::test]
async fn invalid_ratings_are_unprocessable() {
    let router = router_with_store(StaticStore::default());

    let response = router
        .oneshot(post_json(
            "/api/v1/responses",
            serde_json::to_value(submission(&[("q1", 4), ("q2", 7)])).expect("serializes"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("Wait time")));
}

#[tokio::test]
async fn sections_route_filters_by_sector() {
    let router = router_with_store(StaticStore::default());

    let response = router
        .oneshot(
            Request::get("/api/v1/sections?sector_id=north")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["name"], json!("Intake Desk"));
}

#[tokio::test]
async fn unavailable_store_maps_to_service_unavailable() {
    let service = Arc::new(SurveyReportService::new(Arc::new(UnavailableStore)));

    let response = sectors_handler::<UnavailableStore>(State(service)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
