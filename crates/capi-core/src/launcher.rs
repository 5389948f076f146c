//! Contract of the server being supervised.

use crate::LogBridge;

use std::fmt;

use async_trait::async_trait;
use capi_config::ServerConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    /// The real bind found the port taken.
    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("{message}")]
    Failed {
        message: String,
        trace: Option<String>,
    },
}

impl LaunchError {
    pub fn failed(error: impl fmt::Display) -> Self {
        Self::Failed {
            message: error.to_string(),
            trace: None,
        }
    }
}

#[derive(Error, Debug)]
#[error("{message}")]
pub struct CloseError {
    pub message: String,
}

impl CloseError {
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// A live server. Consumed by `close`, so it is closed at most once.
#[async_trait]
pub trait ServerHandle: Send {
    async fn close(self: Box<Self>, graceful: bool) -> Result<(), CloseError>;
}

/// Creates servers. On error the launcher must not leave anything running.
#[async_trait]
pub trait ServerLauncher: Send + Sync {
    async fn start(
        &self,
        config: ServerConfig,
        bridge: LogBridge,
    ) -> Result<Box<dyn ServerHandle>, LaunchError>;
}
