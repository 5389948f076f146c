use crate::{AppState, health, rate_limit, request_log};

use axum::{Router, middleware, routing::get};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/usage", get(health::usage))
        .with_state(state.clone());

    if state.limiter.is_some() {
        router = router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));
    }

    // Health stays reachable while the limiter is saturated
    router = router.route("/health", get(health::health_check));

    if state.config.verbose {
        router = router.layer(middleware::from_fn_with_state(
            state,
            request_log::log_request,
        ));
    }

    router
}
