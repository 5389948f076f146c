use std::sync::{Mutex, PoisonError};

use capi_config::{Config, ServerConfig};
use capi_core::SettingsProvider;
use log::warn;

/// Re-reads `config.toml` and the environment on every snapshot.
///
/// A file that fails to load leaves the last good snapshot in effect, so a
/// half-saved edit does not block restarts. Snapshots read the file
/// synchronously on the calling thread; the file is small and read once per
/// start attempt. The config directory is never created here.
pub struct FileSettings {
    last_good: Mutex<ServerConfig>,
    port_override: Option<u32>,
}

impl FileSettings {
    pub fn new(initial: ServerConfig, port_override: Option<u32>) -> Self {
        Self {
            last_good: Mutex::new(initial),
            port_override,
        }
    }
}

impl SettingsProvider for FileSettings {
    fn snapshot(&self) -> ServerConfig {
        let mut last_good = self
            .last_good
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match Config::reload() {
            Ok(config) => *last_good = config.server,
            Err(e) => warn!("Keeping previous server settings: {e}"),
        }

        let mut snapshot = last_good.clone();
        if let Some(port) = self.port_override {
            snapshot.port = port;
        }
        snapshot
    }
}
