mod account_type;
mod config;
mod error;
mod log_level;
mod logging_config;
mod server_config;
mod supervisor_config;

#[cfg(test)]
mod tests;

pub use account_type::AccountType;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use supervisor_config::SupervisorConfig;

pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65_535;

const CONFIG_DIR_ENV: &str = "CAPI_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".capi";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_PORT: u32 = 4141;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
const DEFAULT_STARTING_HINT_SECS: u64 = 10;
