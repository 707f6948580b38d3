//! Time-driven progress simulation
//!
//! [`ProgressSimulator`] is a synchronous state machine. It performs no I/O
//! and owns no timers: every operation returns the [`SplashAction`]s the
//! runner has to carry out (arm or stop the ticker, schedule the grace delay,
//! publish progress, notify the host). This keeps the simulation
//! deterministic and lets tests drive it tick by tick.
//!
//! ```text
//! Idle ──start──▶ Running ──tick (≥100)──▶ Completing ──grace──▶ Done
//!   │                │                          │
//!   └─start (reduced motion)──▶ Done            │
//!                    └────────cancel────────────┴──▶ Cancelled
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::{GRACE_DELAY, MAX_PERCENT, SplashConfig};
use crate::error::{SplashError, SplashResult};

/// Progress percentage, always within `0..=100`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percent(u8);

impl Percent {
    /// 0%
    pub const ZERO: Percent = Percent(0);
    /// 100%
    pub const MAX: Percent = Percent(MAX_PERCENT);

    /// Create a percentage, clamping anything above 100
    pub fn new(value: u8) -> Self {
        Percent(value.min(MAX_PERCENT))
    }

    /// Raw value in `0..=100`
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the bar is full
    pub fn is_complete(self) -> bool {
        self.0 >= MAX_PERCENT
    }

    /// Add `step`, clamped to 100
    pub fn advance(self, step: u32) -> Self {
        let next = u32::from(self.0)
            .saturating_add(step)
            .min(u32::from(MAX_PERCENT));
        // bounded by MAX_PERCENT above
        Percent(next as u8)
    }

    /// Fraction of the bar that is filled, in `0.0..=1.0`
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / f64::from(MAX_PERCENT)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Lifecycle of a splash run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplashPhase {
    /// Not started yet
    #[default]
    Idle,
    /// Ticker armed, progress advancing
    Running,
    /// Progress reached 100, waiting out the grace delay
    Completing,
    /// Host notified
    Done,
    /// Torn down before completion
    Cancelled,
}

impl SplashPhase {
    /// `Done` and `Cancelled` accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, SplashPhase::Done | SplashPhase::Cancelled)
    }

    /// Whether a timer owned by this run may still fire
    pub fn has_pending_timer(self) -> bool {
        matches!(self, SplashPhase::Running | SplashPhase::Completing)
    }
}

impl fmt::Display for SplashPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplashPhase::Idle => "idle",
            SplashPhase::Running => "running",
            SplashPhase::Completing => "completing",
            SplashPhase::Done => "done",
            SplashPhase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Work the runner must perform after a simulator transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashAction {
    /// Arm the recurring tick; the first tick fires one `interval` from now
    StartTicker { interval: Duration },
    /// Disarm the recurring tick
    StopTicker,
    /// Call [`ProgressSimulator::grace_elapsed`] after `delay`
    ScheduleCompletion { delay: Duration },
    /// Drop the pending grace delay
    CancelCompletion,
    /// Progress changed; publish it to the host
    Progressed(Percent),
    /// Invoke the host's completion callback
    Complete,
}

/// Point-in-time view of a simulator, for rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplashSnapshot {
    pub phase: SplashPhase,
    pub percent: Percent,
    /// Ticks processed so far in this run
    pub ticks: u32,
}

/// Simulated progress from 0 to 100 over a configured duration
#[derive(Debug, Default)]
pub struct ProgressSimulator {
    phase: SplashPhase,
    percent: Percent,
    step: u32,
    ticks: u32,
}

impl ProgressSimulator {
    /// Create an idle simulator at 0%
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a run
    ///
    /// With `reduced_motion` the run finishes on the spot: progress jumps to
    /// 100 and [`SplashAction::Complete`] is returned with no ticker armed.
    pub fn start(&mut self, config: SplashConfig) -> SplashResult<Vec<SplashAction>> {
        if self.phase != SplashPhase::Idle {
            return Err(SplashError::AlreadyStarted { phase: self.phase });
        }
        config.validate()?;
        self.step = config.step;

        if config.reduced_motion {
            self.percent = Percent::MAX;
            self.phase = SplashPhase::Done;
            info!("Reduced motion requested, completing splash immediately");
            return Ok(vec![SplashAction::Progressed(Percent::MAX), SplashAction::Complete]);
        }

        let interval = config.tick_interval();
        self.phase = SplashPhase::Running;
        info!(
            duration_ms = config.duration_ms,
            step = config.step,
            interval_us = interval.as_micros() as u64,
            "Splash started"
        );
        Ok(vec![SplashAction::StartTicker { interval }])
    }

    /// Handle one elapse of the tick cadence
    ///
    /// The tick that brings progress to 100 (exactly or by clamping) also
    /// stops the ticker and schedules the grace delay. Ticks delivered in
    /// any phase other than `Running` are stale and ignored.
    pub fn tick(&mut self) -> Vec<SplashAction> {
        if self.phase != SplashPhase::Running {
            trace!(phase = %self.phase, "Ignoring stale tick");
            return Vec::new();
        }

        self.ticks += 1;
        let mut actions = Vec::with_capacity(3);

        if !self.percent.is_complete() {
            self.percent = self.percent.advance(self.step);
            debug!(percent = %self.percent, tick = self.ticks, "Splash progressed");
            actions.push(SplashAction::Progressed(self.percent));
        }

        if self.percent.is_complete() {
            self.percent = Percent::MAX;
            self.phase = SplashPhase::Completing;
            debug!(
                grace_ms = GRACE_DELAY.as_millis() as u64,
                "Splash reached 100%, scheduling completion"
            );
            actions.push(SplashAction::StopTicker);
            actions.push(SplashAction::ScheduleCompletion { delay: GRACE_DELAY });
        }

        actions
    }

    /// Handle the end of the grace delay
    pub fn grace_elapsed(&mut self) -> Vec<SplashAction> {
        if self.phase != SplashPhase::Completing {
            trace!(phase = %self.phase, "Ignoring stale completion");
            return Vec::new();
        }
        self.phase = SplashPhase::Done;
        info!(ticks = self.ticks, "Splash complete");
        vec![SplashAction::Complete]
    }

    /// Tear the run down
    ///
    /// After this returns, no tick or grace callback changes state or
    /// produces [`SplashAction::Complete`]. Cancelling a finished run is a
    /// no-op.
    pub fn cancel(&mut self) -> Vec<SplashAction> {
        let actions = match self.phase {
            SplashPhase::Done | SplashPhase::Cancelled => return Vec::new(),
            SplashPhase::Idle => Vec::new(),
            SplashPhase::Running => vec![SplashAction::StopTicker],
            SplashPhase::Completing => vec![SplashAction::CancelCompletion],
        };
        info!(phase = %self.phase, percent = %self.percent, "Splash cancelled");
        self.phase = SplashPhase::Cancelled;
        actions
    }

    /// Current progress
    pub fn percent(&self) -> Percent {
        self.percent
    }

    /// Current phase
    pub fn phase(&self) -> SplashPhase {
        self.phase
    }

    /// Ticks processed so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn snapshot(&self) -> SplashSnapshot {
        SplashSnapshot {
            phase: self.phase,
            percent: self.percent,
            ticks: self.ticks,
        }
    }
}
