//! # Saathi Splash
//!
//! Runs the Saathi splash screen on Tokio: a recurring ticker advances the
//! [`saathi_core::ProgressSimulator`], a grace delay follows the final tick,
//! and the host's completion callback fires exactly once.
//!
//! ```ignore
//! use saathi_core::SplashConfig;
//! use saathi_splash::{spawn_splash, SplashOutcome};
//!
//! let handle = spawn_splash(SplashConfig::default(), || println!("ready"))?;
//! let mut updates = handle.subscribe();
//! while updates.changed().await.is_ok() {
//!     let snapshot = *updates.borrow_and_update();
//!     println!("{}", snapshot.percent);
//!     if snapshot.phase.is_terminal() {
//!         break;
//!     }
//! }
//! assert_eq!(handle.finished().await, SplashOutcome::Completed);
//! ```

pub mod driver;
pub mod render;

pub use driver::{CompletionCallback, SplashHandle, SplashOutcome, spawn_splash};
pub use render::{DEFAULT_BAR_WIDTH, render_bar, render_line};
