//! Minimal HTTP server run under the capi supervisor.

pub mod app_state;
pub mod embedded_server;
pub mod error;
pub mod health;
pub mod rate_limit;
pub mod request_log;
pub mod routes;

#[cfg(test)]
mod tests;

pub use app_state::AppState;
pub use embedded_server::{EmbeddedServer, RunningServer};
pub use error::{Result as ServerResult, ServerError};
pub use rate_limit::RequestLimiter;
pub use routes::build_router;
