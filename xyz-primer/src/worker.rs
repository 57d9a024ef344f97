//! Fixed-size tile worker pool.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────┐
//!  LevelTiles ──► │  tile queue  │ (flume, bounded to 4^z)
//!                 └──────┬───────┘
//!            ┌───────────┼───────────┐
//!            ▼           ▼           ▼
//!      tile-worker-0  tile-worker-1 … tile-worker-(cc-1)   GET {url}
//!            │           │           │
//!            └───────────┼───────────┘
//!                        ▼
//!                 ┌──────────────┐
//!                 │   ack queue  │ ──► LevelCoordinator
//!                 └──────────────┘
//! ```
//!
//! A pool lives for exactly one level. Workers exit once the tile queue is
//! closed and drained, and the pool is joined before the next level starts.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::error::{PrimeError, PrimeResult};
use crate::http::TileFetcher;
use crate::level::TileRequest;
use crate::progress::LevelProgress;
use crate::template::UrlTemplate;

/// Acknowledgment for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAck {
    pub tile: TileRequest,
    /// True only for an HTTP 200 response.
    pub primed: bool,
}

/// Everything a worker needs for one level.
pub struct WorkerPayload {
    pub template: Arc<UrlTemplate>,
    pub headers: Arc<HeaderMap>,
    pub fetcher: Arc<dyn TileFetcher>,
    pub tiles: flume::Receiver<TileRequest>,
    pub acks: flume::Sender<TileAck>,
    pub progress: Arc<dyn LevelProgress>,
}

/// Workers started for a single level.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `concurrency` workers sharing one payload.
    ///
    /// The payload is consumed; its ack sender lives on only inside the
    /// workers, so the ack queue disconnects once they have all exited.
    pub fn spawn(concurrency: usize, payload: WorkerPayload) -> PrimeResult<Self> {
        let payload = Arc::new(payload);
        let mut handles = Vec::with_capacity(concurrency);

        for index in 0..concurrency {
            let payload = Arc::clone(&payload);
            let handle = thread::Builder::new()
                .name(format!("tile-worker-{}", index))
                .spawn(move || run_worker(&payload))
                .map_err(|source| PrimeError::WorkerSpawn { index, source })?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    /// Number of running workers.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit.
    pub fn join(self) {
        for handle in self.handles {
            if let Err(panic) = handle.join() {
                warn!("Tile worker panicked: {:?}", panic);
            }
        }
    }
}

/// Worker loop: pull tiles until the queue is closed and empty.
fn run_worker(payload: &WorkerPayload) {
    for tile in payload.tiles.iter() {
        let primed = prime_tile(payload, tile);

        if payload.acks.send(TileAck { tile, primed }).is_err() {
            // Coordinator is gone; nothing left to report to.
            return;
        }
        payload.progress.tile_done();
    }
}

/// Request one tile. Only a 200 counts as primed.
fn prime_tile(payload: &WorkerPayload, tile: TileRequest) -> bool {
    let url = payload.template.render(&tile);

    match payload.fetcher.get(&url, &payload.headers) {
        Ok(200) => true,
        Ok(status) => {
            debug!(url = %url, status, "Tile request returned non-200 status");
            false
        }
        Err(e) => {
            debug!(url = %url, error = %e, "Tile request failed");
            false
        }
    }
}
