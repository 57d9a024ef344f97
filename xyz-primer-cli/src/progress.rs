//! Terminal progress bars.
//!
//! One bar per zoom level. When a level finishes its bar is cleared and the
//! level summary is printed in its place.
//!
//! Bars and log lines share stderr, so bars are hidden whenever debug logging
//! may be active; see [`bars_hidden`].

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use xyz_primer::progress::{LevelProgress, ProgressSink};
use xyz_primer::stats::LevelStats;

const BAR_TEMPLATE: &str =
    "{msg} {wide_bar:.cyan/blue} {pos}/{len} tiles ({per_sec}, eta {eta})";

/// Progress sink backed by indicatif.
#[derive(Debug, Default)]
pub struct BarProgress {
    hidden: bool,
}

impl BarProgress {
    /// Bars drawn to the terminal.
    pub fn new() -> Self {
        Self { hidden: false }
    }

    /// Bars that never draw; summaries are still printed.
    pub fn hidden() -> Self {
        Self { hidden: true }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

/// Whether bars should stay hidden so they do not interleave with log lines
/// on stderr. Summaries on stdout are printed either way.
pub fn bars_hidden(verbose: bool, rust_log: Option<&str>) -> bool {
    verbose || rust_log.is_some_and(|filter| !filter.trim().is_empty())
}

impl ProgressSink for BarProgress {
    fn start_level(&self, zoom: u8, tiles: u64) -> Arc<dyn LevelProgress> {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(tiles)
        };
        bar.set_length(tiles);
        bar.set_style(Self::style());
        bar.set_message(format!("Priming zoom level {}:", zoom));
        Arc::new(LevelBar { bar })
    }
}

/// Bar for a single level.
struct LevelBar {
    bar: ProgressBar,
}

impl LevelProgress for LevelBar {
    fn tile_done(&self) {
        self.bar.inc(1);
    }

    fn finish(&self, stats: &LevelStats) {
        self.bar.finish_and_clear();
        if let Some(line) = stats.failure_line() {
            println!("{}", line);
        }
        println!("{}", stats);
    }

    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}
