//! Level-by-level priming.
//!
//! [`LevelCoordinator`] drives a single zoom level through
//! `Idle → Dispatching → AwaitingAcks → LevelComplete`. [`Primer`] runs the
//! coordinator for every level from 0 to the configured maximum, strictly in
//! order, and folds each level into the run totals.
//!
//! Each level gets its own queue, ack channel and worker pool. Nothing but
//! the immutable template, headers and HTTP client carries over from one
//! level to the next.
//!
//! There is no retry, and unless a request timeout is configured a tile
//! server that never answers stalls its level indefinitely.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::HeaderMap;
use tracing::{debug, info};

use crate::config::PrimerConfig;
use crate::error::{PrimeError, PrimeResult};
use crate::http::{ReqwestFetcher, TileFetcher};
use crate::level::{enqueue_level, tile_count};
use crate::progress::{NoopProgress, ProgressSink};
use crate::stats::{LevelStats, RunStats};
use crate::template::UrlTemplate;
use crate::worker::{WorkerPayload, WorkerPool};

/// Where a level is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// Nothing allocated yet.
    Idle,
    /// Workers started, tiles being enqueued.
    Dispatching,
    /// Queue closed, draining acknowledgments.
    AwaitingAcks,
    /// Every tile acknowledged and the pool joined.
    LevelComplete,
}

/// Runs one zoom level at a time.
pub struct LevelCoordinator {
    template: Arc<UrlTemplate>,
    headers: Arc<HeaderMap>,
    fetcher: Arc<dyn TileFetcher>,
    progress: Arc<dyn ProgressSink>,
    concurrency: usize,
}

impl LevelCoordinator {
    /// Create a coordinator around an HTTP client.
    pub fn new(config: &PrimerConfig, fetcher: Arc<dyn TileFetcher>) -> Self {
        Self {
            template: Arc::new(config.template().clone()),
            headers: Arc::new(config.headers().clone()),
            fetcher,
            progress: Arc::new(NoopProgress),
            concurrency: config.concurrency(),
        }
    }

    /// Report progress to `sink` instead of discarding it.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Request every tile at `zoom` and wait until each one is acknowledged.
    ///
    /// Tile failures are counted, never returned as errors. An error here
    /// means the level itself could not run to completion.
    pub fn prime_level(&self, zoom: u8) -> PrimeResult<LevelStats> {
        let started = Instant::now();
        let expected = tile_count(zoom);
        let capacity = usize::try_from(expected).unwrap_or(usize::MAX);
        trace_phase(zoom, LevelPhase::Idle);

        let (tile_tx, tile_rx) = flume::bounded(capacity);
        let (ack_tx, ack_rx) = flume::bounded(capacity);
        let progress = self.progress.start_level(zoom, expected);

        let payload = WorkerPayload {
            template: Arc::clone(&self.template),
            headers: Arc::clone(&self.headers),
            fetcher: Arc::clone(&self.fetcher),
            tiles: tile_rx,
            acks: ack_tx,
            progress: Arc::clone(&progress),
        };

        let workers = worker_count(self.concurrency, capacity);
        let pool = match WorkerPool::spawn(workers, payload) {
            Ok(pool) => pool,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        debug!(zoom, workers = pool.size(), "Worker pool started");
        trace_phase(zoom, LevelPhase::Dispatching);
        enqueue_level(zoom, tile_tx);

        trace_phase(zoom, LevelPhase::AwaitingAcks);
        let mut stats = LevelStats::new(zoom);
        while stats.attempted < expected {
            match ack_rx.recv() {
                Ok(ack) => stats.record(ack.primed),
                Err(_) => {
                    pool.join();
                    progress.abandon();
                    return Err(PrimeError::WorkersExited {
                        zoom,
                        received: stats.attempted,
                        expected,
                    });
                }
            }
        }

        pool.join();
        stats.elapsed = started.elapsed();
        trace_phase(zoom, LevelPhase::LevelComplete);

        progress.finish(&stats);
        info!(
            zoom,
            attempted = stats.attempted,
            failed = stats.failed,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Zoom level primed"
        );

        Ok(stats)
    }
}

/// Workers for a level with `tiles` tiles: never more workers than tiles.
fn worker_count(concurrency: usize, tiles: usize) -> usize {
    concurrency.min(tiles).max(1)
}

fn trace_phase(zoom: u8, phase: LevelPhase) {
    debug!(zoom, phase = ?phase, "Level phase");
}

/// Primes levels `0..=max_zoom` in order.
pub struct Primer {
    coordinator: LevelCoordinator,
    max_zoom: u8,
}

impl Primer {
    /// Create a primer that talks to the network through reqwest.
    pub fn new(config: &PrimerConfig) -> PrimeResult<Self> {
        let fetcher = match config.request_timeout() {
            Some(timeout) => ReqwestFetcher::with_timeout(timeout)?,
            None => ReqwestFetcher::new()?,
        };
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a primer around any HTTP client.
    pub fn with_fetcher(config: &PrimerConfig, fetcher: Arc<dyn TileFetcher>) -> Self {
        Self {
            coordinator: LevelCoordinator::new(config, fetcher),
            max_zoom: config.max_zoom(),
        }
    }

    /// Report progress to `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.coordinator = self.coordinator.with_progress(sink);
        self
    }

    /// Prime every level, returning the run totals.
    ///
    /// The run counts as finished even when tiles failed; check
    /// [`RunStats::failed`] for that.
    pub fn run(&self) -> PrimeResult<RunStats> {
        let started = Instant::now();
        let mut run = RunStats::new();

        info!(max_zoom = self.max_zoom, "Priming started");
        for zoom in 0..=self.max_zoom {
            let level = self.coordinator.prime_level(zoom)?;
            run.fold(level);
        }
        run.elapsed = started.elapsed();

        info!(
            attempted = run.attempted,
            failed = run.failed,
            elapsed_ms = run.elapsed.as_millis() as u64,
            "Priming finished"
        );
        Ok(run)
    }
}
