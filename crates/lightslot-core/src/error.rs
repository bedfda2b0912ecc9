use thiserror::Error;

use crate::types::LightId;

/// Errors returned by handle-based light operations.
///
/// Running out of hardware slots is not an error; allocation reports it
/// as `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LightError {
    #[error("{0} refers to a recycled light record")]
    StaleHandle(LightId),

    #[error("{0} has been killed")]
    Destroyed(LightId),
}

/// Errors that can occur while loading lighting configuration or light lists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse lighting config RON: {0}")]
    ConfigParseError(String),

    #[error("Failed to parse light list RON: {0}")]
    LightListParseError(String),

    #[error("max_lights must be in 1..={max}, got {actual}")]
    InvalidMaxLights { max: usize, actual: usize },

    #[error("influence_cutoff must be in (0, 1), got {0}")]
    InvalidInfluenceCutoff(f32),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}
