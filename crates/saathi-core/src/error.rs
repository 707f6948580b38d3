//! Error types for the Saathi splash screen

use thiserror::Error;

use crate::progress::SplashPhase;

/// Top-level error type for the splash screen
#[derive(Debug, Error)]
pub enum SplashError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Splash cannot be started from phase {phase}")]
    AlreadyStarted { phase: SplashPhase },
}

/// Errors raised when validating a [`SplashConfig`](crate::SplashConfig)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("duration_ms must be greater than zero")]
    ZeroDuration,

    #[error("step must be in 1..=100, got {0}")]
    StepOutOfRange(u32),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidOverride { key: String, value: String },
}

/// Errors reported by a label provider
///
/// These never escape to the host: label resolution falls back to the
/// built-in defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("Label provider unavailable")]
    ProviderUnavailable,

    #[error("Missing label: {0}")]
    MissingLabel(String),

    #[error("Label catalogue parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for LabelError {
    fn from(e: serde_json::Error) -> Self {
        LabelError::Parse(e.to_string())
    }
}

/// Result type alias for splash operations
pub type SplashResult<T> = Result<T, SplashError>;
