mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::{MockConnectInfoLayer, PRIMARY, SECONDARY_B, SECONDARY_C};
use redirect_rotator::api::handlers::redirect_handler;
use redirect_rotator::domain::entities::RoutingRule;
use redirect_rotator::infrastructure::rate_counter::MemoryCounter;
use redirect_rotator::state::AppState;
use std::sync::Arc;

fn redirect_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{rule_id}", get(redirect_handler))
        .layer(MockConnectInfoLayer::default())
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_disabled_rotation_goes_to_primary() {
    let server = redirect_server(common::create_test_state(100, 20));

    let response = server.get("/evergreen").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), PRIMARY);
    assert_eq!(response.header("x-ratelimit-limit"), "100");
    assert_eq!(response.header("x-ratelimit-remaining"), "99");
}

#[tokio::test]
async fn test_redirect_rotation_stays_within_configured_destinations() {
    let server = redirect_server(common::create_test_state(1_000, 20));

    for _ in 0..50 {
        let response = server.get("/spring-sale").await;
        assert_eq!(response.status_code(), 307);

        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(
            [PRIMARY, SECONDARY_B, SECONDARY_C].contains(&location),
            "unexpected destination {location}"
        );
    }
}

#[tokio::test]
async fn test_redirect_full_split_never_picks_primary() {
    let server = redirect_server(common::create_test_state(1_000, 20));

    for _ in 0..50 {
        let response = server.get("/full-split").await;
        assert_ne!(response.header("location"), PRIMARY);
    }
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = redirect_server(common::create_test_state(100, 20));

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 404);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["rule_id"], "nonexistent");
}

#[tokio::test]
async fn test_redirect_rate_limited_after_quota() {
    let server = redirect_server(common::create_test_state(3, 20));

    for expected_remaining in ["2", "1", "0"] {
        let response = server.get("/evergreen").await;
        assert_eq!(response.status_code(), 307);
        assert_eq!(response.header("x-ratelimit-remaining"), expected_remaining);
    }

    let response = server.get("/evergreen").await;

    assert_eq!(response.status_code(), 429);
    assert_eq!(response.header("x-ratelimit-limit"), "3");
    assert_eq!(response.header("x-ratelimit-remaining"), "0");

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "rate_limited");
}

#[tokio::test]
async fn test_unknown_rule_still_counts_against_quota() {
    let server = redirect_server(common::create_test_state(1, 20));

    let response = server.get("/nonexistent").await;
    assert_eq!(response.status_code(), 404);

    let response = server.get("/evergreen").await;
    assert_eq!(response.status_code(), 429);
}

#[tokio::test]
async fn test_rate_limit_is_per_forwarded_client() {
    let mut state = common::create_test_state(1, 20);
    state.behind_proxy = true;
    let server = redirect_server(state);

    let first = server
        .get("/evergreen")
        .add_header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .await;
    assert_eq!(first.status_code(), 307);

    let same_client = server
        .get("/evergreen")
        .add_header("x-forwarded-for", "203.0.113.7")
        .await;
    assert_eq!(same_client.status_code(), 429);

    let other_client = server
        .get("/evergreen")
        .add_header("x-forwarded-for", "198.51.100.2")
        .await;
    assert_eq!(other_client.status_code(), 307);
}

#[tokio::test]
async fn test_forwarded_header_ignored_without_proxy_trust() {
    let server = redirect_server(common::create_test_state(1, 20));

    let first = server
        .get("/evergreen")
        .add_header("x-forwarded-for", "203.0.113.7")
        .await;
    assert_eq!(first.status_code(), 307);

    // Same socket peer, so a spoofed header does not buy a fresh window.
    let second = server
        .get("/evergreen")
        .add_header("x-forwarded-for", "198.51.100.2")
        .await;
    assert_eq!(second.status_code(), 429);
}

#[tokio::test]
async fn test_counter_outage_fails_open() {
    let state = common::create_state_with_counter(Arc::new(common::DownCounter), 2, 20);
    let server = redirect_server(state);

    for _ in 0..5 {
        let response = server.get("/evergreen").await;
        assert_eq!(response.status_code(), 307);
        assert_eq!(response.header("x-ratelimit-remaining"), "2");
    }
}

#[tokio::test]
async fn test_unsendable_destination_is_json_internal_error() {
    let rules = vec![RoutingRule::new("intl", "https://a.example/pro\nmo")];
    let state = common::create_state_from_rules(rules, Arc::new(MemoryCounter::new()), 100, 20);
    let server = redirect_server(state);

    let response = server.get("/intl").await;

    assert_eq!(response.status_code(), 500);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["details"]["reason"], "invalid_destination");
}
