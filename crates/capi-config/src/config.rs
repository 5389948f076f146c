use crate::{
    CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    LoggingConfig, ServerConfig, SupervisorConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub supervisor: SupervisorConfig,
}

impl Config {
    /// Load config from disk and the environment.
    ///
    /// Loading order:
    /// 1. Check for CAPI_CONFIG_DIR env var, else use ./.capi/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply CAPI_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        Self::read_from(&config_dir)
    }

    /// Re-read config.toml and the environment without touching the
    /// filesystem layout. A missing directory yields defaults.
    ///
    /// Performs blocking file I/O.
    pub fn reload() -> ConfigErrorResult<Self> {
        Self::read_from(&Self::config_dir()?)
    }

    fn read_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: CAPI_CONFIG_DIR env var > ./.capi/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.supervisor.validate()?;

        if let Some(ref file) = self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::config(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute path of the log file, if one is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref file) => Ok(Some(Self::config_dir()?.join(file))),
            None => Ok(None),
        }
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: port={} account={} verbose={}",
            self.server.port, self.server.account_type, self.server.verbose
        );
        match self.server.rate_limit_seconds {
            Some(secs) => info!(
                "  rate_limit: {}s ({})",
                secs,
                if self.server.rate_limit_wait {
                    "wait"
                } else {
                    "reject"
                }
            ),
            None => info!("  rate_limit: disabled"),
        }
        info!(
            "  proxy_env: {}, show_token: {}",
            self.server.proxy_env, self.server.show_token
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
        info!(
            "  supervisor: starting hint after {}s",
            self.supervisor.starting_hint_secs
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_parse("CAPI_PORT", &mut self.server.port);
        Self::apply_env_bool("CAPI_VERBOSE", &mut self.server.verbose);
        Self::apply_env_parse("CAPI_ACCOUNT_TYPE", &mut self.server.account_type);
        Self::apply_env_option_parse(
            "CAPI_RATE_LIMIT_SECONDS",
            &mut self.server.rate_limit_seconds,
        );
        Self::apply_env_bool("CAPI_RATE_LIMIT_WAIT", &mut self.server.rate_limit_wait);
        Self::apply_env_bool("CAPI_PROXY_ENV", &mut self.server.proxy_env);
        Self::apply_env_bool("CAPI_SHOW_TOKEN", &mut self.server.show_token);

        // Logging
        Self::apply_env_parse("CAPI_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_option_string("CAPI_LOG_FILE", &mut self.logging.file);
        Self::apply_env_bool("CAPI_LOG_COLORED", &mut self.logging.colored);

        // Supervisor
        Self::apply_env_parse(
            "CAPI_STARTING_HINT_SECS",
            &mut self.supervisor.starting_hint_secs,
        );
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for optional parseable values
    fn apply_env_option_parse<T: std::str::FromStr>(var_name: &str, target: &mut Option<T>) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = Some(parsed);
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
