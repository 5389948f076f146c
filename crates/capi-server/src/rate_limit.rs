//! Minimum-interval request limiting.

use crate::{AppState, ServerError, ServerResult};

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use capi_config::ServerConfig;
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};

/// Admits at most one request per configured interval.
pub struct RequestLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
    interval: Duration,
    wait: bool,
}

impl RequestLimiter {
    /// `None` when no interval is configured or the interval is zero.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let interval = Duration::from_secs(config.rate_limit_seconds?);
        let quota = Quota::with_period(interval)?;

        Some(Self {
            limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
            interval,
            wait: config.rate_limit_wait,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn waits(&self) -> bool {
        self.wait
    }

    /// Take a slot if one is open, else report the time until the next.
    pub fn try_admit(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Admit immediately if allowed. Otherwise wait for the next slot when
    /// configured to, or fail with the time left until one opens.
    pub async fn admit(&self) -> ServerResult<()> {
        match self.try_admit() {
            Ok(()) => Ok(()),
            Err(_) if self.wait => {
                self.limiter.until_ready().await;
                Ok(())
            }
            Err(retry_after) => Err(ServerError::rate_limited(retry_after)),
        }
    }
}

/// Middleware enforcing the configured request interval.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(limiter) = state.limiter.as_deref() else {
        return next.run(request).await;
    };

    if let Err(retry_after) = limiter.try_admit() {
        if !limiter.waits() {
            state.bridge.warn("Rate limit exceeded. Rejecting request.");
            return ServerError::rate_limited(retry_after).into_response();
        }

        state.bridge.warn(format!(
            "Rate limit reached. Waiting {}s before proceeding...",
            retry_after.as_secs().max(1)
        ));
        if let Err(e) = limiter.admit().await {
            return e.into_response();
        }
        state.bridge.info("Rate limit wait completed, proceeding with request");
    }

    next.run(request).await
}
