//! Spinner feedback for long-running phases
//!
//! The interactive flows print their own per-package lines, so a spinner
//! for the scan/install phases is all the visual feedback needed.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner wrapper, disabled in quiet mode
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner with a message for an indeterminate operation
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Stop and erase the current spinner
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled_is_inert() {
        let mut progress = Progress::disabled();
        progress.spinner("working");
        assert!(progress.bar.is_none());
        progress.finish_and_clear();
    }

    #[test]
    fn test_progress_enabled_lifecycle() {
        let mut progress = Progress::new(true);
        progress.spinner("working");
        assert!(progress.bar.is_some());
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }
}
