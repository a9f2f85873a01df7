use tracing::info;

use crate::error::Result;
use crate::grid::Grid;
use crate::mesh::MeshStore;

use super::{
    BuildGrid, CancelToken, NoProgress, Normalization, Normalize, ProgressSink, RasterParams,
    RasterReport, Rasterize, Resolution,
};

/// A normalized height field together with how it was produced.
#[derive(Debug, Clone)]
pub struct Heatmap {
    /// Normalized grid, heights in `[0, 1]`.
    pub grid: Grid,
    /// Raster pass summary.
    pub report: RasterReport,
    /// Normalization outcome.
    pub normalization: Normalization,
}

/// Runs grid construction, rasterization and normalization in sequence.
#[derive(Debug, Default)]
pub struct GenerateHeatmap {
    resolution: Resolution,
    params: RasterParams,
}

impl GenerateHeatmap {
    /// Creates a new `GenerateHeatmap` operation.
    #[must_use]
    pub fn new(resolution: Resolution, params: RasterParams) -> Self {
        Self { resolution, params }
    }

    /// Executes the pipeline without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`GenerateHeatmap::execute_with`].
    pub fn execute(&self, store: &MeshStore) -> Result<Heatmap> {
        self.execute_with(store, &mut NoProgress, &CancelToken::new())
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// - `RasterError::NoActiveGeometry` if no active object has a face
    /// - `RasterError::EmptyGrid` / `RasterError::InvalidParameters` if the
    ///   resolution does not yield a usable grid
    /// - `RasterError::Cancelled` if `cancel` was triggered
    pub fn execute_with(
        &self,
        store: &MeshStore,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<Heatmap> {
        let mut grid = BuildGrid::new(self.resolution).execute(store)?;
        let report = Rasterize::new(self.params).execute_with(store, &mut grid, progress, cancel)?;
        let normalization = Normalize::new().execute(&mut grid);
        info!(
            width = grid.width(),
            height = grid.height(),
            valid = grid.valid_count(),
            "heatmap ready"
        );
        Ok(Heatmap {
            grid,
            report,
            normalization,
        })
    }
}
