//! Progress reporting hooks.
//!
//! The coordinator asks a [`ProgressSink`] for a [`LevelProgress`] at the start
//! of each level. Workers tick it once per acknowledged tile, and the
//! coordinator finishes it with the level's stats.

use std::sync::Arc;

use crate::stats::LevelStats;

/// Per-level progress handle shared by every worker of that level.
pub trait LevelProgress: Send + Sync {
    /// One tile has been acknowledged.
    fn tile_done(&self);

    /// Every tile of the level has been acknowledged.
    fn finish(&self, stats: &LevelStats);

    /// The level ended early and will never finish.
    fn abandon(&self) {}
}

/// Factory for per-level progress handles.
pub trait ProgressSink: Send + Sync {
    /// A level with `tiles` tiles is about to be dispatched.
    fn start_level(&self, zoom: u8, tiles: u64) -> Arc<dyn LevelProgress>;
}

/// Sink that discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl LevelProgress for NoopProgress {
    fn tile_done(&self) {}

    fn finish(&self, _stats: &LevelStats) {}
}

impl ProgressSink for NoopProgress {
    fn start_level(&self, _zoom: u8, _tiles: u64) -> Arc<dyn LevelProgress> {
        Arc::new(NoopProgress)
    }
}
