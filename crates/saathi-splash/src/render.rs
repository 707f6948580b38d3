//! Plain-text rendering of the splash screen

use saathi_core::{Percent, SplashLabels, SplashSnapshot};

/// Bar width used when the host does not pick one
pub const DEFAULT_BAR_WIDTH: usize = 32;

const FILLED: char = '#';
const EMPTY: char = '-';

/// Draw a progress bar `width` cells wide
pub fn render_bar(percent: Percent, width: usize) -> String {
    let filled = usize::from(percent.value()) * width / 100;
    let mut bar = String::with_capacity(width);
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar
}

/// One line of splash output: app name, loading text, bar, percentage
pub fn render_line(labels: &SplashLabels, snapshot: &SplashSnapshot, width: usize) -> String {
    format!(
        "{} · {} [{}] {:>3}%",
        labels.app_name,
        labels.loading_text,
        render_bar(snapshot.percent, width),
        snapshot.percent.value()
    )
}
