use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use game_core::{GameError, GameSettings};
use serde::Deserialize;
use shared::domain::GuessRange;

/// Host settings. Read from `server.toml` when present, then overridden by
/// `APP__*` environment variables (`APP__BIND_ADDR`, `APP__MAX_ATTEMPTS`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub default_min: i64,
    pub default_max: i64,
    pub max_attempts: u32,
    pub hints_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let game = GameSettings::default();
        Self {
            bind_addr: "127.0.0.1:8501".into(),
            default_min: game.range().min,
            default_max: game.range().max,
            max_attempts: game.max_attempts(),
            hints_enabled: game.hints_enabled(),
        }
    }
}

impl Settings {
    /// Game defaults every new session starts from.
    pub fn game_settings(&self) -> Result<GameSettings, GameError> {
        GameSettings::new(
            GuessRange {
                min: self.default_min,
                max: self.default_max,
            },
            self.max_attempts,
            self.hints_enabled,
        )
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new("server.toml"))
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to read settings from '{}'", path.display()))?
        .try_deserialize()
        .context("invalid server settings")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
