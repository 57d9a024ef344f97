//! Zoom level planning.
//!
//! A zoom level `z` in the XYZ scheme is a square grid of `2^z × 2^z` tiles.
//! The planner enumerates that grid x-major, y-minor and feeds it into a
//! level's work queue.
//!
//! ```text
//! z = 1            enumeration order
//! ┌─────┬─────┐
//! │ 0,0 │ 1,0 │    (0,0) (0,1) (1,0) (1,1)
//! ├─────┼─────┤
//! │ 0,1 │ 1,1 │
//! └─────┴─────┘
//! ```

use tracing::trace;

/// Deepest zoom level the planner accepts.
///
/// At zoom 30 the tile count `4^30` still fits a `u64` and every coordinate
/// fits a `u32`.
pub const MAX_ZOOM: u8 = 30;

/// A single tile to prime.
///
/// # Example
///
/// ```
/// use xyz_primer::level::TileRequest;
///
/// let tile = TileRequest::new(2, 3, 1);
/// assert_eq!(tile.zoom(), 2);
/// assert_eq!(tile.x(), 3);
/// assert_eq!(tile.y(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRequest {
    zoom: u8,
    x: u32,
    y: u32,
}

impl TileRequest {
    /// Create a new tile request.
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Get the zoom level.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Get the tile column.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Get the tile row.
    pub fn y(&self) -> u32 {
        self.y
    }
}

/// Number of tiles along one edge of the grid at `zoom` (`2^zoom`).
#[inline]
pub fn side_length(zoom: u8) -> u32 {
    debug_assert!(zoom <= MAX_ZOOM);
    1u32 << zoom
}

/// Number of tiles in the grid at `zoom` (`4^zoom`).
#[inline]
pub fn tile_count(zoom: u8) -> u64 {
    debug_assert!(zoom <= MAX_ZOOM);
    1u64 << (2 * u32::from(zoom))
}

/// Total tiles across levels `0..=max_zoom`.
pub fn run_tile_count(max_zoom: u8) -> u64 {
    (0..=max_zoom).map(tile_count).sum()
}

/// Iterator over every tile of one zoom level, x-major then y-minor.
#[derive(Debug, Clone)]
pub struct LevelTiles {
    zoom: u8,
    side: u64,
    next: u64,
    end: u64,
}

impl LevelTiles {
    /// Iterate the full grid at `zoom`.
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            side: u64::from(side_length(zoom)),
            next: 0,
            end: tile_count(zoom),
        }
    }
}

impl Iterator for LevelTiles {
    type Item = TileRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let x = (self.next / self.side) as u32;
        let y = (self.next % self.side) as u32;
        self.next += 1;
        Some(TileRequest::new(self.zoom, x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Push every tile at `zoom` into a level queue, then close it.
///
/// The sender is consumed; dropping it is what tells the workers there is no
/// more work. The queue must have room for [`tile_count`] items so the push
/// never blocks. Returns the number of tiles enqueued.
pub fn enqueue_level(zoom: u8, tiles: flume::Sender<TileRequest>) -> u64 {
    let mut pushed = 0;
    for tile in LevelTiles::new(zoom) {
        // Workers only disappear early if they panic; the coordinator
        // notices that through the ack channel.
        if tiles.send(tile).is_err() {
            break;
        }
        pushed += 1;
    }
    trace!(zoom, pushed, "Level queue closed");
    pushed
}
