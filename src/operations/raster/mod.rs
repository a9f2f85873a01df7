mod build_grid;
mod heatmap;
mod normalize;
mod rasterize;

pub use build_grid::BuildGrid;
pub use heatmap::{GenerateHeatmap, Heatmap};
pub use normalize::{Normalization, Normalize};
pub use rasterize::{RasterReport, Rasterize};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::Sender;

use crate::error::RasterError;
use crate::math::Aabb2;

/// Pixel-count target used when no resolution is given.
pub const DEFAULT_PIXEL_COUNT: u64 = 1_000_000;

/// How finely the grid samples the mesh footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// World units between adjacent samples.
    Precision(f64),
    /// Approximate number of cells; the precision is derived from the mesh
    /// footprint assuming square cells.
    PixelCount(u64),
}

impl Default for Resolution {
    fn default() -> Self {
        Self::PixelCount(DEFAULT_PIXEL_COUNT)
    }
}

impl Resolution {
    /// Resolves the sample spacing for a footprint.
    ///
    /// # Errors
    ///
    /// - `RasterError::InvalidParameters` for a zero pixel count
    /// - `RasterError::EmptyGrid` when a pixel-count target meets a footprint
    ///   with zero area
    #[allow(clippy::cast_precision_loss)]
    pub fn precision_for(&self, bounds: &Aabb2) -> Result<f64, RasterError> {
        match *self {
            Self::Precision(precision) => Ok(precision),
            Self::PixelCount(0) => Err(RasterError::InvalidParameters(
                "pixel count must be greater than zero".to_owned(),
            )),
            Self::PixelCount(pixels) => {
                let extent = bounds.extent();
                let precision = (extent.x * extent.y / pixels as f64).sqrt();
                if precision > 0.0 {
                    Ok(precision)
                } else {
                    Err(RasterError::EmptyGrid {
                        width: 0,
                        height: 0,
                    })
                }
            }
        }
    }
}

/// Parameters controlling a raster pass.
#[derive(Debug, Clone, Copy)]
pub struct RasterParams {
    /// Number of candidate cells between two progress reports. Zero reports
    /// only once the pass completes.
    pub progress_interval: u64,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            progress_interval: 4096,
        }
    }
}

/// Snapshot of rasterization progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterProgress {
    /// Candidate cells tested so far.
    pub cells_processed: u64,
    /// Candidate cells the whole pass will test.
    pub cells_total: u64,
}

impl RasterProgress {
    /// Completed share in `[0, 1]`; an empty pass counts as complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.cells_total == 0 {
            1.0
        } else {
            (self.cells_processed as f64 / self.cells_total as f64).min(1.0)
        }
    }
}

/// Receives progress updates from a raster pass.
pub trait ProgressSink {
    /// Called at the configured cadence and once at the end of the pass.
    fn report(&mut self, progress: RasterProgress);
}

impl<F: FnMut(RasterProgress)> ProgressSink for F {
    fn report(&mut self, progress: RasterProgress) {
        self(progress);
    }
}

/// Discards all progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: RasterProgress) {}
}

/// Forwards progress updates to another thread.
///
/// Updates are dropped once the receiving side has hung up.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<RasterProgress>,
}

impl ChannelProgress {
    /// Wraps the sending half of a channel.
    #[must_use]
    pub fn new(sender: Sender<RasterProgress>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&mut self, progress: RasterProgress) {
        let _ = self.sender.send(progress);
    }
}

/// Shared flag used to stop a raster pass from another thread.
///
/// Checked once per face; a cancelled pass leaves the grid partially filled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
