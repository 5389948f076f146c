//! [`ServerLauncher`] implementation backed by axum.

use crate::{AppState, ServerError, ServerResult, build_router};

use async_trait::async_trait;
use capi_config::ServerConfig;
use capi_core::{
    CloseError, ENDPOINT_HOST, LOOPBACK_HOST, LaunchError, LogBridge, ServerHandle, ServerLauncher,
};
use log::{debug, info};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Launches the HTTP server on loopback.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedServer;

impl EmbeddedServer {
    pub fn new() -> Self {
        Self
    }

    async fn bind(config: &ServerConfig) -> ServerResult<(TcpListener, u16)> {
        let port = config
            .bind_port()
            .ok_or_else(|| ServerError::invalid_port(config.port))?;

        let listener = TcpListener::bind((LOOPBACK_HOST, port))
            .await
            .map_err(|e| ServerError::bind(port, e))?;

        Ok((listener, port))
    }
}

#[async_trait]
impl ServerLauncher for EmbeddedServer {
    async fn start(
        &self,
        config: ServerConfig,
        bridge: LogBridge,
    ) -> Result<Box<dyn ServerHandle>, LaunchError> {
        let (listener, port) = Self::bind(&config).await?;

        publish_summary(&config, &bridge);
        let app = build_router(AppState::new(config, bridge.clone()));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender also shuts the server down
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("Embedded server listening on {LOOPBACK_HOST}:{port}");
        bridge.info(format!("Listening on http://{ENDPOINT_HOST}:{port}/"));

        Ok(Box::new(RunningServer {
            port,
            shutdown: shutdown_tx,
            task,
        }))
    }
}

fn publish_summary(config: &ServerConfig, bridge: &LogBridge) {
    bridge.info(format!("Using {} plan GitHub account", config.account_type));
    if let Some(seconds) = config.rate_limit_seconds {
        let mode = if config.rate_limit_wait { "wait" } else { "reject" };
        bridge.info(format!("Rate limit: 1 request per {seconds}s ({mode})"));
    }
    if config.verbose {
        bridge.info("Verbose logging enabled");
    }
    if config.proxy_env {
        bridge.info("Proxy settings taken from environment");
    }
}

/// A server started by [`EmbeddedServer`].
pub struct RunningServer {
    port: u16,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

#[async_trait]
impl ServerHandle for RunningServer {
    async fn close(self: Box<Self>, graceful: bool) -> Result<(), CloseError> {
        let RunningServer {
            port,
            shutdown,
            task,
        } = *self;

        if graceful {
            // The serve task may already have exited on its own
            let _ = shutdown.send(());
        } else {
            task.abort();
        }

        match task.await {
            Ok(Ok(())) => {
                debug!("Embedded server on port {port} closed");
                Ok(())
            }
            Ok(Err(e)) => Err(CloseError::new(e)),
            Err(e) if e.is_cancelled() => {
                debug!("Embedded server on port {port} aborted");
                Ok(())
            }
            Err(e) => Err(CloseError::new(e)),
        }
    }
}
