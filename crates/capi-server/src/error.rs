use std::panic::Location;
use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use capi_core::LaunchError;
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Port {port} is already in use {location}")]
    AddrInUse { port: u16, location: ErrorLocation },

    #[error("Failed to bind port {port}: {source} {location}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Invalid port: {port} {location}")]
    InvalidPort { port: u32, location: ErrorLocation },

    #[error("Rate limit exceeded, retry in {}s {location}", retry_after.as_secs().max(1))]
    RateLimited {
        retry_after: Duration,
        location: ErrorLocation,
    },
}

impl ServerError {
    #[track_caller]
    pub(crate) fn bind(port: u16, source: std::io::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());
        if source.kind() == std::io::ErrorKind::AddrInUse {
            Self::AddrInUse { port, location }
        } else {
            Self::Bind {
                port,
                source,
                location,
            }
        }
    }

    #[track_caller]
    pub(crate) fn invalid_port(port: u32) -> Self {
        Self::InvalidPort {
            port,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn rate_limited(retry_after: Duration) -> Self {
        Self::RateLimited {
            retry_after,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ServerError> for LaunchError {
    fn from(e: ServerError) -> Self {
        match e {
            ServerError::AddrInUse { port, .. } => LaunchError::PortInUse { port },
            ServerError::Bind { ref source, .. } => LaunchError::Failed {
                message: source.to_string(),
                trace: Some(e.to_string()),
            },
            other => LaunchError::failed(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        log::warn!("{}", self);

        match self {
            ServerError::RateLimited { retry_after, .. } => {
                let secs = retry_after.as_secs().max(1);
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: "RATE_LIMITED".into(),
                        message: format!("Rate limit exceeded. Retry in {secs}s."),
                    },
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(secs));
                response
            }
            other => {
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: "INTERNAL_ERROR".into(),
                        message: other.to_string(),
                    },
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
