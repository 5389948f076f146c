use crate::AppState;

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Publish one line per request and one per response at debug level.
pub async fn log_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    state.bridge.debug(format!("<-- {method} {path}"));
    let response = next.run(request).await;
    state.bridge.debug(format!(
        "--> {method} {path} {} {}ms",
        response.status().as_u16(),
        started.elapsed().as_millis()
    ));

    response
}
