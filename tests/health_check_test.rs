//! Health, readiness and metrics endpoint tests.

mod common;

use axum::http::StatusCode;
use common::{get, TestApp};
use http_body_util::BodyExt;

#[tokio::test]
async fn health_reports_ok_when_collaborators_are_up() {
    let app = TestApp::spawn();

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "invoice-dashboard");
}

#[tokio::test]
async fn readiness_reports_ok() {
    let app = TestApp::spawn();

    let response = get(&app.router, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let app = TestApp::spawn();

    // Drive at least one write through so counters exist.
    app.create(&[
        ("customerId", "c1"),
        ("amount", "10"),
        ("status", "pending"),
    ])
    .await;

    let response = get(&app.router, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("invoice_dashboard_writes_total"));
}
