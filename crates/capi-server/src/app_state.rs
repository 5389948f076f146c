use crate::RequestLimiter;

use std::sync::Arc;

use capi_config::ServerConfig;
use capi_core::LogBridge;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub bridge: LogBridge,
    pub limiter: Option<Arc<RequestLimiter>>,
}

impl AppState {
    pub fn new(config: ServerConfig, bridge: LogBridge) -> Self {
        let limiter = RequestLimiter::from_config(&config).map(Arc::new);
        Self {
            config: Arc::new(config),
            bridge,
            limiter,
        }
    }
}
