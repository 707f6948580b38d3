//! # Saathi Core
//!
//! Progress simulation, configuration, labels, and errors for the Saathi
//! splash screen.
//!
//! The simulator is sans-I/O: it never sleeps or spawns. A runner (see the
//! `saathi-splash` crate) owns the timers and feeds elapsed ticks back in,
//! which lets tests step through a run deterministically.
//!
//! ## Key Types
//!
//! - [`ProgressSimulator`]: the state machine driving a run from 0 to 100%
//! - [`SplashAction`]: what the runner must do after each transition
//! - [`SplashConfig`]: duration, step, and reduced-motion preference
//! - [`LabelProvider`]: optional source of localized text, with defaults
//!
//! ## Example
//!
//! ```
//! use saathi_core::{ProgressSimulator, SplashAction, SplashConfig};
//!
//! let mut sim = ProgressSimulator::new();
//! let actions = sim
//!     .start(SplashConfig::default().with_duration_ms(100).with_step(50))
//!     .unwrap();
//! assert!(matches!(actions[0], SplashAction::StartTicker { .. }));
//!
//! sim.tick();
//! let actions = sim.tick();
//! assert!(actions.contains(&SplashAction::StopTicker));
//! assert_eq!(sim.grace_elapsed(), vec![SplashAction::Complete]);
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod progress;

// Re-export main types
pub use config::*;
pub use error::*;
pub use labels::*;
pub use progress::*;
