//! Runtime configuration supplied by the page at `init()` time.
//!
//! Every field has a default, so `{}` (or any subset of fields) is a valid
//! config. Anything that fails to parse or validate falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Lives at the start of every run.
    pub max_lives: u32,
    /// Points taken away by `wrong_answer`.
    pub wrong_answer_penalty: u32,
    /// localStorage key the session JSON is written under.
    pub storage_key: String,
    /// How many finished runs the leaderboard remembers.
    pub history_size: usize,
    /// `console_log` level: error, warn, info, debug or trace.
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_lives: 3,
            wrong_answer_penalty: 5,
            storage_key: "fraud_academy_session".to_string(),
            history_size: 5,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "max_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.level().is_none() {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: format!("unknown level {:?}", self.log_level),
            });
        }
        Ok(())
    }

    /// The configured log level as a `log::Level`.
    pub fn level(&self) -> Option<log::Level> {
        self.log_level.parse().ok()
    }
}
