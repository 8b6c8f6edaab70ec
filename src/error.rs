/// Error types for everything outside the simulation step.
///
/// The step itself never fails: every numeric hazard is clamped or floored.
/// Errors only come from loading and validating configuration.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A tunable is outside the range the simulation can work with.
    #[error("config value '{name}' = {value} is invalid (expected {expected})")]
    InvalidConfig {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

/// Returns an error unless `value` is finite and strictly positive.
pub fn ensure_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value,
            expected: "a finite value > 0",
        })
    }
}

/// Returns an error unless `min <= value <= max`.
pub fn ensure_range(name: &'static str, value: f32, min: f32, max: f32) -> GameResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value,
            expected: "a value inside the documented range",
        })
    }
}
