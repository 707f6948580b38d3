//! Saathi Splash - terminal host
//!
//! Shows the loading splash as a text progress bar, then reports "ready".
//!
//! Usage:
//!   saathi-splash
//!   saathi-splash --duration-ms 1000 --step 5 --labels hi.json
//!   SAATHI_REDUCED_MOTION=1 saathi-splash --reduced-motion=false
//!   saathi-splash --log-format pretty --log-file logs/splash.jsonl

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use saathi_core::{LabelProvider, SplashConfig, SplashLabels, StaticLabels};
use saathi_logging::{ConsoleFormat, DEFAULT_LEVEL, LogSettings, SaathiSubscriberBuilder};
use saathi_splash::{DEFAULT_BAR_WIDTH, SplashOutcome, render_line, spawn_splash};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "saathi-splash")]
#[command(about = "Show the Saathi loading splash in the terminal")]
struct Args {
    /// Total simulated duration in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Percentage added on each tick (1-100)
    #[arg(long)]
    step: Option<u32>,

    /// Skip the animation and finish immediately; `=false` overrides the environment
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    reduced_motion: Option<bool>,

    /// JSON label catalogue, e.g. {"appName": "...", "loading": "..."}
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// Width of the progress bar in characters
    #[arg(short, long, default_value_t = DEFAULT_BAR_WIDTH)]
    width: usize,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, default_value = DEFAULT_LEVEL)]
    log_level: String,

    /// Log output on stderr: jsonl, pretty or off
    #[arg(long, default_value_t = ConsoleFormat::Jsonl)]
    log_format: ConsoleFormat,

    /// Also append JSONL logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Environment overrides first, then command-line flags on top
    fn splash_config(&self) -> anyhow::Result<SplashConfig> {
        Ok(self.apply_flags(SplashConfig::from_env()?))
    }

    fn apply_flags(&self, mut config: SplashConfig) -> SplashConfig {
        if let Some(duration_ms) = self.duration_ms {
            config = config.with_duration_ms(duration_ms);
        }
        if let Some(step) = self.step {
            config = config.with_step(step);
        }
        if let Some(reduced_motion) = self.reduced_motion {
            config = config.with_reduced_motion(reduced_motion);
        }
        config
    }

    fn log_settings(&self) -> LogSettings {
        let settings = LogSettings::default()
            .with_level(self.log_level.clone())
            .with_console(self.log_format);
        match &self.log_file {
            Some(path) => settings.with_log_file(path),
            None => settings,
        }
    }
}

/// Load a label catalogue; any failure means "no provider"
fn load_catalogue(path: &Path) -> Option<StaticLabels> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Label catalogue unavailable");
            return None;
        }
    };
    match StaticLabels::from_json(&json) {
        Ok(catalogue) => Some(catalogue),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Label catalogue unreadable");
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _log_guard = SaathiSubscriberBuilder::new()
        .with_settings(args.log_settings())
        .init();

    let config = args.splash_config()?;
    let catalogue = args.labels.as_deref().and_then(load_catalogue);
    let labels = SplashLabels::resolve(catalogue.as_ref().map(|c| c as &dyn LabelProvider));

    let handle = spawn_splash(config, || info!("Splash finished, handing over"))?;
    let mut updates = handle.subscribe();

    loop {
        let snapshot = *updates.borrow_and_update();
        println!("{}", render_line(&labels, &snapshot, args.width));
        if snapshot.phase.is_terminal() {
            break;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
            }
        }
    }

    match handle.finished().await {
        SplashOutcome::Completed => println!("ready"),
        SplashOutcome::Cancelled => eprintln!("cancelled"),
    }
    Ok(())
}
