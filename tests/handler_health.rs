mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use redirect_rotator::api::handlers::health_handler;
use redirect_rotator::state::AppState;
use std::sync::Arc;
use std::time::Duration;

fn health_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = health_server(common::create_test_state(100, 20));

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["rate_counter"]["status"], "ok");
    assert_eq!(json["checks"]["rate_counter"]["message"], "memory reachable");
    assert_eq!(json["checks"]["rules"]["status"], "ok");
    assert_eq!(json["checks"]["rules"]["message"], "3 rules loaded");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = health_server(common::create_test_state(100, 20));

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("rate_counter").is_some());
    assert!(json["checks"].get("rules").is_some());
}

#[tokio::test]
async fn test_health_reports_counter_outage() {
    let state = common::create_state_with_counter(Arc::new(common::DownCounter), 100, 20);
    let server = health_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["rate_counter"]["status"], "error");
    assert_eq!(json["checks"]["rules"]["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_unresponsive_counter() {
    let state = common::create_state_with_counter(Arc::new(common::HangingCounter), 100, 20);
    let server = health_server(state);

    let response = tokio::time::timeout(Duration::from_secs(5), server.get("/health"))
        .await
        .expect("health endpoint should answer despite a hanging store");

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["rate_counter"]["status"], "error");
    assert_eq!(
        json["checks"]["rate_counter"]["message"],
        "hanging unreachable, admitting all requests"
    );
}
