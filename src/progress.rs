// src/progress.rs
// =============================================================================
// Progress bar on stderr, advanced once per analysed website.
//
// The bar is drawn only when stderr is a terminal and the user did not turn
// it off (--no-progress, NO_COLOR or WASC_NO_PROGRESS). Otherwise it still
// counts websites but draws nothing, so the report on stdout and piped logs
// stay clean.
// =============================================================================

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::analysis::RunRecord;

const TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/dim}] {pos}/{len} {msg}";

pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// A bar for `total` websites, drawn when `enabled` and interactive.
    pub fn new(total: usize, enabled: bool) -> Self {
        let target = if enabled && is_interactive() {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(total as u64), target);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        Self { bar }
    }

    /// A bar that never draws.
    pub fn hidden(total: usize) -> Self {
        Self::new(total, false)
    }

    /// Counts one more finished website.
    pub fn advance(&self, record: &RunRecord) {
        self.bar.set_message(record.label.clone());
        self.bar.inc(1);
    }

    /// Websites finished so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn is_interactive() -> bool {
    std::io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && std::env::var_os("WASC_NO_PROGRESS").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Website;

    fn record(label: &str) -> RunRecord {
        RunRecord::new(&Website {
            label: label.to_string(),
            url: "https://example.com".to_string(),
        })
    }

    #[test]
    fn test_hidden_bar_still_counts() {
        let progress = Progress::hidden(2);
        progress.advance(&record("A"));
        progress.advance(&record("B"));
        assert_eq!(progress.position(), 2);
        progress.finish();
    }

    #[test]
    fn test_disabled_bar_is_hidden() {
        let progress = Progress::new(1, false);
        assert!(progress.bar.is_hidden());
    }
}
