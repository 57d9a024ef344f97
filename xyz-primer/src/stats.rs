//! Per-level and per-run counters.
//!
//! [`LevelStats`] is written only by the level coordinator while it drains
//! acknowledgments. [`RunStats`] is written only by the driver, once per
//! finished level. Neither is shared across threads.

use std::fmt;
use std::time::Duration;

/// Outcome of priming one zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStats {
    pub zoom: u8,
    pub attempted: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl LevelStats {
    /// Empty counters for `zoom`.
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            attempted: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Count one acknowledgment.
    pub fn record(&mut self, primed: bool) {
        self.attempted += 1;
        if !primed {
            self.failed += 1;
        }
    }

    /// Tiles that answered 200.
    pub fn primed(&self) -> u64 {
        self.attempted - self.failed
    }

    /// `"<n> tiles failed to prime in zoom level <z>"`, only when something failed.
    pub fn failure_line(&self) -> Option<String> {
        (self.failed > 0).then(|| {
            format!(
                "{} tiles failed to prime in zoom level {}",
                self.failed, self.zoom
            )
        })
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Primed zoom level {}. [{}/{} tiles] in {:.2?}",
            self.zoom,
            self.primed(),
            self.attempted,
            self.elapsed
        )
    }
}

/// Totals across every level of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub levels: Vec<LevelStats>,
    pub attempted: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished level into the totals.
    pub fn fold(&mut self, level: LevelStats) {
        self.attempted += level.attempted;
        self.failed += level.failed;
        self.levels.push(level);
    }

    /// Tiles that answered 200 across the run.
    pub fn primed(&self) -> u64 {
        self.attempted - self.failed
    }

    /// Deepest level completed, if any.
    pub fn max_zoom(&self) -> Option<u8> {
        self.levels.last().map(|level| level.zoom)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_zoom() {
            Some(max_zoom) => write!(
                f,
                "Primed zoom levels 0-{}. [{}/{} tiles] in {:.2?}.",
                max_zoom,
                self.primed(),
                self.attempted,
                self.elapsed
            ),
            // Only reachable for a RunStats that never folded a level.
            None => write!(f, "No zoom levels primed."),
        }
    }
}
