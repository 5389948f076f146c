use capi_config::ServerConfig;

/// Source of the server settings, read once per start attempt.
pub trait SettingsProvider: Send + Sync {
    fn snapshot(&self) -> ServerConfig;
}
