// Mon Oct 19 2026 - Alex

use crate::search::{CancellationToken, ProgressMonitor};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// indicatif progress bar driven by a search.
pub struct SearchProgressBar {
    bar: ProgressBar,
    token: CancellationToken,
}

impl SearchProgressBar {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self::from_bar(bar)
    }

    /// A bar that never draws, for quiet runs and tests.
    pub fn hidden() -> Self {
        Self::from_bar(ProgressBar::hidden())
    }

    fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            token: CancellationToken::new(),
        }
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl Default for SearchProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMonitor for SearchProgressBar {
    fn begin(&self, task: &str, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(task.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(120));
    }

    fn sub_task(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn worked(&self, units: usize) {
        self.bar.inc(units as u64);
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn done(&self) {
        if self.token.is_cancelled() {
            self.bar.abandon_with_message("cancelled");
        } else {
            self.bar.finish_with_message("done");
        }
    }
}
