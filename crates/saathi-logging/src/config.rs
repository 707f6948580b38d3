//! Logging settings for the splash host

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Level used when neither the host nor `RUST_LOG` picks one.
///
/// The splash draws its progress on stdout, so only problems are logged by
/// default.
pub const DEFAULT_LEVEL: &str = "warn";

/// How log events are written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Human-readable, with colors
    Pretty,
    /// Nothing on the console
    Off,
}

impl fmt::Display for ConsoleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsoleFormat::Jsonl => "jsonl",
            ConsoleFormat::Pretty => "pretty",
            ConsoleFormat::Off => "off",
        };
        f.write_str(name)
    }
}

impl FromStr for ConsoleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" | "json" => Ok(ConsoleFormat::Jsonl),
            "pretty" => Ok(ConsoleFormat::Pretty),
            "off" | "none" => Ok(ConsoleFormat::Off),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Where and how much the splash logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Level filter, overridden by `RUST_LOG`
    pub level: String,
    /// Console output on stderr
    pub console: ConsoleFormat,
    /// JSONL copy of every event, appended to this file
    pub log_file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            console: ConsoleFormat::default(),
            log_file: None,
        }
    }
}

impl LogSettings {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_console(mut self, console: ConsoleFormat) -> Self {
        self.console = console;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Directory and file name of the log file, if one is set.
    ///
    /// A bare file name lives in the current directory.
    pub fn log_file_parts(&self) -> Option<(&Path, &Path)> {
        let path = self.log_file.as_deref()?;
        let name = Path::new(path.file_name()?);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Some((dir, name))
    }
}
