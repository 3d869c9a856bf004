//! Error types for the progression controller and configuration loading.

use thiserror::Error;

use crate::game::minigame::GameId;

/// Rejections from [`crate::game::controller::Controller`] operations.
///
/// Every operation validates before it mutates, so receiving one of these
/// means the session is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("level {0} does not exist")]
    InvalidLevel(u32),

    #[error("level {level} is locked (current level is {current})")]
    LevelLocked { level: u32, current: u32 },

    #[error("{0} is locked until its first level is reached")]
    GameLocked(GameId),

    #[error("choice {choice} is not an option for level {level}")]
    InvalidChoice { level: u32, choice: usize },

    #[error("name must be between 1 and {max} characters")]
    InvalidName { max: usize },

    #[error("an adventure is already in progress")]
    AlreadyStarted,

    #[error("no adventure started yet")]
    NotStarted,

    #[error("nothing is being played right now")]
    NotPlaying,

    #[error("finish or leave the current activity first")]
    Busy,

    #[error("the adventure is over, start a new one")]
    SessionOver,
}

/// Problems with a supplied [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
