use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Invalid port: {port} (must be 1-65535) {location}")]
    InvalidConfig { port: u32, location: ErrorLocation },

    #[error("Port {port} is already in use {location}")]
    PortUnavailable { port: u16, location: ErrorLocation },

    #[error("Server failed to start: {message} {location}")]
    ServerStartFailure {
        message: String,
        trace: Option<String>,
        location: ErrorLocation,
    },

    #[error("Failed to close server: {message} {location}")]
    ServerCloseFailure {
        message: String,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub(crate) fn invalid_config(port: u32) -> Self {
        Self::InvalidConfig {
            port,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn port_unavailable(port: u16) -> Self {
        Self::PortUnavailable {
            port,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn start_failure(message: String, trace: Option<String>) -> Self {
        Self::ServerStartFailure {
            message,
            trace,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn close_failure(message: String) -> Self {
        Self::ServerCloseFailure {
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Message shown to the user, without source locations.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidConfig { port, .. } => {
                format!("Invalid port: {port} (must be 1-65535).")
            }
            Self::PortUnavailable { port, .. } => {
                format!("Port {port} is already in use. Change \"port\" in settings.")
            }
            Self::ServerStartFailure { message, .. } => format!("Copilot API failed: {message}"),
            Self::ServerCloseFailure { message, .. } => {
                format!("Failed to close server: {message}")
            }
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "Set \"port\" to a value between 1 and 65535.",
            Self::PortUnavailable { .. } => {
                "Another application is using the port. \
                   Free it or change \"port\" in settings."
            }
            Self::ServerStartFailure { .. } => "Check the output log for details.",
            Self::ServerCloseFailure { .. } => "The server was released anyway; no action needed.",
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
