//! Logging for the Saathi splash screen
//!
//! Installs a global `tracing` subscriber from [`LogSettings`]. Progress is
//! drawn on stdout, so console logs go to stderr:
//!
//! - **JSONL** (default) or **pretty** console output, or none at all
//! - an optional JSONL log file, appended across runs
//! - `RUST_LOG` overrides the configured level
//!
//! ```ignore
//! use saathi_logging::{ConsoleFormat, LogSettings, SaathiSubscriberBuilder};
//!
//! let settings = LogSettings::default()
//!     .with_console(ConsoleFormat::Pretty)
//!     .with_log_file("logs/splash.jsonl");
//! let _guard = SaathiSubscriberBuilder::new().with_settings(settings).init();
//! ```

pub mod config;

pub use config::{ConsoleFormat, DEFAULT_LEVEL, LogSettings};

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log file error: {0}")]
    Io(#[from] io::Error),

    #[error("Log appender error: {0}")]
    Appender(String),

    #[error("Invalid log level: {0}")]
    Level(#[from] ParseError),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// JSONL fmt layer writing to `$writer`
macro_rules! jsonl_layer {
    ($writer:expr) => {
        tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_current_span(true)
            .with_span_list(true)
            .flatten_event(true)
            .with_writer($writer)
    };
}

/// Builds the splash's subscriber from [`LogSettings`]
#[derive(Debug, Default)]
pub struct SaathiSubscriberBuilder {
    settings: LogSettings,
}

impl SaathiSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: LogSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Install the subscriber globally
    ///
    /// Keep the returned guard alive while logging to a file; dropping it
    /// flushes the file. Failures are reported on stderr and leave logging
    /// disabled, the splash itself still runs.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }

    /// Install the subscriber globally, reporting failures
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogError> {
        let (subscriber, guard) = self.build()?;
        subscriber.try_init()?;
        Ok(guard)
    }

    /// Assemble the subscriber without installing it
    pub fn build(
        self,
    ) -> Result<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>), LogError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.settings.level))?;

        let console = self.settings.console;
        let pretty = (console == ConsoleFormat::Pretty)
            .then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(true));
        let jsonl = (console == ConsoleFormat::Jsonl).then(|| jsonl_layer!(io::stderr));

        let (file, guard) = match self.settings.log_file_parts() {
            Some((dir, name)) => {
                let (writer, guard) = open_log_file(dir, name)?;
                (Some(jsonl_layer!(writer)), Some(guard))
            }
            None => (None, None),
        };

        let subscriber = Registry::default()
            .with(filter)
            .with(pretty)
            .with(jsonl)
            .with(file);
        Ok((subscriber, guard))
    }
}

/// Open `dir/name` for appending, creating the directory if needed
fn open_log_file(dir: &Path, name: &Path) -> Result<(NonBlocking, WorkerGuard), LogError> {
    fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| LogError::Appender(e.to_string()))?;
    Ok(tracing_appender::non_blocking(appender))
}
