mod common;

use axum::{Router, middleware};
use axum_test::TestServer;
use common::{MockConnectInfoLayer, PRIMARY, SECONDARY_B, SECONDARY_C};
use redirect_rotator::api::middleware::rate_limit;
use redirect_rotator::api::routes::api_routes;
use redirect_rotator::state::AppState;
use serde_json::{Value, json};

fn api_server(state: AppState) -> TestServer {
    let api = api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit::layer,
    ));

    let app = Router::new()
        .nest("/api", api)
        .layer(MockConnectInfoLayer::default())
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_simulate_rotating_rule() {
    let server = api_server(common::create_test_state(100, 20));

    let response = server
        .post("/api/rules/spring-sale/simulate")
        .json(&json!({ "iterations": 20000 }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["rule_id"], "spring-sale");
    assert_eq!(json["iterations"], 20000);

    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["url"], PRIMARY);
    assert_eq!(rows[0]["label"], "primary");
    assert_eq!(rows[0]["is_primary"], true);
    assert_eq!(rows[0]["configured_weight"], 40);
    assert_eq!(rows[1]["url"], SECONDARY_B);
    assert_eq!(rows[2]["url"], SECONDARY_C);

    let hits: u64 = rows.iter().map(|r| r["actual_hits"].as_u64().unwrap()).sum();
    assert_eq!(hits, 20000);

    for row in rows {
        let configured = row["configured_percentage"].as_f64().unwrap();
        let actual = row["actual_percentage"].as_f64().unwrap();
        assert!(
            (configured - actual).abs() < 3.0,
            "{} drifted: configured {configured}, actual {actual}",
            row["url"]
        );
    }
}

#[tokio::test]
async fn test_simulate_disabled_rule_reports_primary_only() {
    let server = api_server(common::create_test_state(100, 20));

    let response = server
        .post("/api/rules/evergreen/simulate")
        .json(&json!({ "iterations": 500 }))
        .await;

    response.assert_status_ok();

    let rows = response.json::<Value>()["rows"].as_array().unwrap().clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["actual_hits"], 500);
    assert_eq!(rows[0]["actual_percentage"], 100.0);
}

#[tokio::test]
async fn test_simulate_rejects_out_of_range_iterations() {
    let server = api_server(common::create_test_state(100, 20));

    for iterations in [0, 1_000_001] {
        let response = server
            .post("/api/rules/spring-sale/simulate")
            .json(&json!({ "iterations": iterations }))
            .await;

        assert_eq!(response.status_code(), 400);
        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn test_simulate_unknown_rule() {
    let server = api_server(common::create_test_state(100, 20));

    let response = server
        .post("/api/rules/missing/simulate")
        .json(&json!({ "iterations": 10 }))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_api_rate_limit() {
    let server = api_server(common::create_test_state(100, 2));

    for expected_remaining in ["1", "0"] {
        let response = server
            .post("/api/rules/evergreen/simulate")
            .json(&json!({ "iterations": 1 }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.header("x-ratelimit-limit"), "2");
        assert_eq!(response.header("x-ratelimit-remaining"), expected_remaining);
    }

    let response = server
        .post("/api/rules/evergreen/simulate")
        .json(&json!({ "iterations": 1 }))
        .await;

    assert_eq!(response.status_code(), 429);
    assert_eq!(response.json::<Value>()["error"]["code"], "rate_limited");
}
