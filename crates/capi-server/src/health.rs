use crate::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET / - Plain liveness text
pub async fn root() -> &'static str {
    "Server running"
}

/// GET /health - Status and version
pub async fn health_check() -> Response {
    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /usage - Account and rate-limit settings of this server instance
pub async fn usage(State(state): State<AppState>) -> Response {
    let config = &state.config;
    let usage = json!({
        "account_type": config.account_type.as_str(),
        "rate_limit": {
            "seconds": config.rate_limit_seconds,
            "wait": config.rate_limit_wait,
        },
    });

    (StatusCode::OK, Json(usage)).into_response()
}
