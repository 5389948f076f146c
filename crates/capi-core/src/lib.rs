//! Lifecycle supervision for the embedded Copilot API server.
//!
//! The [`Supervisor`] starts, stops and restarts exactly one server at a
//! time. Log output from the server flows through a [`LogBridge`], which
//! sanitizes terminal control sequences before lines reach the host UI.

pub mod error;
pub mod inspect;
pub mod launcher;
pub mod lifecycle;
pub mod log_bridge;
pub mod log_event;
pub mod port;
pub mod sanitizer;
pub mod server_status;
pub mod settings;
pub mod start_outcome;
pub mod ui;
pub mod usage;

pub use error::{Result as SupervisorResult, SupervisorError};
pub use inspect::inspect;
pub use launcher::{CloseError, LaunchError, ServerHandle, ServerLauncher};
pub use lifecycle::Supervisor;
pub use log_bridge::LogBridge;
pub use log_event::{Additional, LogArg, LogEvent};
pub use port::PortChecker;
pub use sanitizer::strip_ansi;
pub use server_status::ServerStatus;
pub use settings::SettingsProvider;
pub use start_outcome::StartOutcome;
pub use ui::{NotifyLevel, OutputSink, UiAction, UiNotifier};
pub use usage::usage_viewer_url;

#[cfg(test)]
mod tests;

/// Interface the port check and embedded server bind to.
pub const LOOPBACK_HOST: &str = "127.0.0.1";
/// Host name published in endpoints.
pub const ENDPOINT_HOST: &str = "localhost";
