use crate::{ConfigError, ConfigErrorResult, DEFAULT_STARTING_HINT_SECS};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Delay before the "still starting" hint is shown
    pub starting_hint_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            starting_hint_secs: DEFAULT_STARTING_HINT_SECS,
        }
    }
}

impl SupervisorConfig {
    pub fn starting_hint_delay(&self) -> Duration {
        Duration::from_secs(self.starting_hint_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.starting_hint_secs == 0 {
            return Err(ConfigError::supervisor(
                "supervisor.starting_hint_secs must be at least 1",
            ));
        }

        Ok(())
    }
}
