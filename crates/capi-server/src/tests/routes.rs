use crate::tests::create_test_server;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use capi_config::{AccountType, ServerConfig};
use googletest::assert_that;
use googletest::prelude::{contains, eq, ge, starts_with};
use serde_json::Value;

fn limited(seconds: u64, wait: bool) -> ServerConfig {
    ServerConfig {
        rate_limit_seconds: Some(seconds),
        rate_limit_wait: wait,
        ..ServerConfig::default()
    }
}

// =========================================================================
// Endpoints
// =========================================================================

#[tokio::test]
async fn given_server_when_get_root_then_running_text() {
    // Given
    let (server, _sink) = create_test_server(ServerConfig::default());

    // When
    let response = server.get("/").await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::OK));
    assert_that!(response.text(), eq("Server running"));
}

#[tokio::test]
async fn given_server_when_get_health_then_healthy_json() {
    // Given
    let (server, _sink) = create_test_server(ServerConfig::default());

    // When
    let response = server.get("/health").await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::OK));
    let json: Value = response.json();
    assert_that!(json["status"], eq(&Value::from("healthy")));
    assert_that!(
        json["version"],
        eq(&Value::from(env!("CARGO_PKG_VERSION")))
    );
}

#[tokio::test]
async fn given_business_account_when_get_usage_then_settings_reported() {
    // Given
    let config = ServerConfig {
        account_type: AccountType::Business,
        rate_limit_seconds: Some(30),
        rate_limit_wait: true,
        ..ServerConfig::default()
    };
    let (server, _sink) = create_test_server(config);

    // When
    let response = server.get("/usage").await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::OK));
    let json: Value = response.json();
    assert_that!(json["account_type"], eq(&Value::from("business")));
    assert_that!(json["rate_limit"]["seconds"], eq(&Value::from(30)));
    assert_that!(json["rate_limit"]["wait"], eq(&Value::from(true)));
}

#[tokio::test]
async fn given_unknown_path_when_get_then_not_found() {
    // Given
    let (server, _sink) = create_test_server(ServerConfig::default());

    // When
    let response = server.get("/v1/nope").await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::NOT_FOUND));
}

// =========================================================================
// Rate limiting
// =========================================================================

#[tokio::test]
async fn given_no_rate_limit_when_many_requests_then_all_succeed() {
    // Given
    let (server, _sink) = create_test_server(ServerConfig::default());

    // When / Then
    for _ in 0..5 {
        assert_that!(server.get("/usage").await.status_code(), eq(StatusCode::OK));
    }
}

#[tokio::test]
async fn given_rate_limit_when_second_request_too_soon_then_rejected_with_429() {
    // Given
    let (server, sink) = create_test_server(limited(60, false));
    server.get("/usage").await;

    // When
    let response = server.get("/usage").await;

    // Then
    assert_that!(
        response.status_code(),
        eq(StatusCode::TOO_MANY_REQUESTS)
    );
    let json: Value = response.json();
    assert_that!(json["error"]["code"], eq(&Value::from("RATE_LIMITED")));
    let retry_after: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_that!(retry_after, ge(1));
    assert_that!(
        sink.lines(),
        contains(eq(&"[warn] Rate limit exceeded. Rejecting request.".to_string()))
    );
}

#[tokio::test]
async fn given_saturated_limiter_when_get_health_then_still_ok() {
    // Given
    let (server, _sink) = create_test_server(limited(60, false));
    server.get("/").await;

    // When
    let response = server.get("/health").await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::OK));
}

#[tokio::test]
async fn given_rate_limit_wait_when_second_request_too_soon_then_delayed_not_rejected() {
    // Given
    let (server, sink) = create_test_server(limited(1, true));
    server.get("/").await;
    let started = Instant::now();

    // When
    let response = server.get("/").await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::OK));
    assert_that!(started.elapsed(), ge(Duration::from_millis(500)));
    assert_that!(
        sink.lines(),
        contains(starts_with("[warn] Rate limit reached. Waiting"))
    );
}

// =========================================================================
// Verbose request logging
// =========================================================================

#[tokio::test]
async fn given_verbose_when_request_then_request_and_response_published() {
    // Given
    let config = ServerConfig {
        verbose: true,
        ..ServerConfig::default()
    };
    let (server, sink) = create_test_server(config);

    // When
    server.get("/health").await;

    // Then
    let lines = sink.lines();
    assert_that!(lines, contains(eq(&"[debug] <-- GET /health".to_string())));
    assert_that!(lines, contains(starts_with("[debug] --> GET /health 200 ")));
}

#[tokio::test]
async fn given_not_verbose_when_request_then_nothing_published() {
    // Given
    let (server, sink) = create_test_server(ServerConfig::default());

    // When
    server.get("/health").await;

    // Then
    assert_that!(sink.lines().len(), eq(0));
}
