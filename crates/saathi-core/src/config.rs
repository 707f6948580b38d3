//! Configuration for a splash run

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default total simulated duration in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Default increment applied on each tick
pub const DEFAULT_STEP: u32 = 2;

/// Pause between reaching 100% and notifying the host, so the last frame renders
pub const GRACE_DELAY: Duration = Duration::from_millis(300);

/// Upper bound of the progress percentage
pub const MAX_PERCENT: u8 = 100;

/// Environment variable overriding [`SplashConfig::duration_ms`]
pub const ENV_DURATION_MS: &str = "SAATHI_SPLASH_DURATION_MS";

/// Environment variable overriding [`SplashConfig::step`]
pub const ENV_STEP: &str = "SAATHI_SPLASH_STEP";

/// Environment variable overriding [`SplashConfig::reduced_motion`]
pub const ENV_REDUCED_MOTION: &str = "SAATHI_REDUCED_MOTION";

/// Configuration for one splash run
///
/// Immutable once handed to [`ProgressSimulator::start`](crate::ProgressSimulator::start).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Total simulated duration in milliseconds
    pub duration_ms: u64,
    /// Percentage added on each tick
    pub step: u32,
    /// Skip the animation and complete immediately
    pub reduced_motion: bool,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            step: DEFAULT_STEP,
            reduced_motion: false,
        }
    }
}

impl SplashConfig {
    /// Create a config that completes without animating
    pub fn instant() -> Self {
        Self {
            reduced_motion: true,
            ..Self::default()
        }
    }

    /// Create a config for a short splash (one second, 5% steps)
    pub fn brisk() -> Self {
        Self {
            duration_ms: 1000,
            step: 5,
            reduced_motion: false,
        }
    }

    /// Set the total duration
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the per-tick increment
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Set the reduced-motion preference
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// Build a config from defaults plus environment overrides
    ///
    /// Reads [`ENV_DURATION_MS`], [`ENV_STEP`] and [`ENV_REDUCED_MOTION`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Unset keys leave the current value alone. Values that fail to parse
    /// are rejected rather than ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DURATION_MS) {
            self.duration_ms = parse_override(ENV_DURATION_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STEP) {
            self.step = parse_override(ENV_STEP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REDUCED_MOTION) {
            self.reduced_motion = parse_flag(ENV_REDUCED_MOTION, &raw)?;
        }
        Ok(self)
    }

    /// Validate the configuration
    ///
    /// A zero duration or a step outside `1..=100` would make the tick
    /// cadence meaningless, so both are rejected here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.step == 0 || self.step > u32::from(MAX_PERCENT) {
            return Err(ConfigError::StepOutOfRange(self.step));
        }
        Ok(())
    }

    /// Check if the configuration is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Cadence of the recurring tick: `duration_ms / (100 / step)`
    ///
    /// Computed in microseconds so steps that do not divide 100 keep their
    /// fractional period. Only meaningful for a validated config.
    pub fn tick_interval(&self) -> Duration {
        let micros = self
            .duration_ms
            .saturating_mul(1000)
            .saturating_mul(u64::from(self.step))
            / u64::from(MAX_PERCENT);
        Duration::from_micros(micros)
    }

    /// Number of ticks that advance progress before it reaches 100
    pub fn expected_ticks(&self) -> u32 {
        if self.step == 0 {
            return 0;
        }
        u32::from(MAX_PERCENT).div_ceil(self.step)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "reduce" => Ok(true),
        "0" | "false" | "no" | "off" | "no-preference" => Ok(false),
        _ => Err(ConfigError::InvalidOverride {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
