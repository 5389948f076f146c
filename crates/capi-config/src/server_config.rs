use crate::{AccountType, ConfigError, ConfigErrorResult, DEFAULT_PORT, MAX_PORT, MIN_PORT};

use serde::Deserialize;

/// Settings handed to the embedded server on every start attempt.
///
/// `port` is wider than `u16` so that out-of-range values
/// survive parsing and are rejected by validation with a clear message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u32,
    pub verbose: bool,
    pub account_type: AccountType,
    /// Minimum seconds between upstream requests (None = unlimited)
    pub rate_limit_seconds: Option<u64>,
    /// Wait instead of rejecting when the rate limit is hit
    pub rate_limit_wait: bool,
    /// Use proxy settings from the process environment
    pub proxy_env: bool,
    /// Print the upstream token on startup
    pub show_token: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            verbose: false,
            account_type: AccountType::default(),
            rate_limit_seconds: None,
            rate_limit_wait: false,
            proxy_env: false,
            show_token: false,
        }
    }
}

impl ServerConfig {
    /// The port as a bindable `u16`, if it is within 1-65535.
    pub fn bind_port(&self) -> Option<u16> {
        if (MIN_PORT..=MAX_PORT).contains(&self.port) {
            u16::try_from(self.port).ok()
        } else {
            None
        }
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.bind_port().is_none() {
            return Err(ConfigError::server(format!(
                "server.port must be {}-{}, got {}",
                MIN_PORT, MAX_PORT, self.port
            )));
        }

        Ok(())
    }
}
