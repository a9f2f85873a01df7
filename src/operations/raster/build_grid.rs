use tracing::debug;

use crate::error::Result;
use crate::grid::Grid;
use crate::mesh::MeshStore;
use crate::operations::query::MeshBoundingBox;

use super::Resolution;

/// Sizes an empty grid over the footprint of a mesh's active objects.
#[derive(Debug, Default)]
pub struct BuildGrid {
    resolution: Resolution,
}

impl BuildGrid {
    /// Creates a new `BuildGrid` operation.
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Executes the operation, returning a grid with no valid cells.
    ///
    /// # Errors
    ///
    /// - `RasterError::NoActiveGeometry` if no active object has a face
    /// - `RasterError::EmptyGrid` if the resolution leaves an axis without samples
    /// - `RasterError::InvalidParameters` for an unusable resolution
    pub fn execute(&self, store: &MeshStore) -> Result<Grid> {
        let bounds = MeshBoundingBox::new().execute(store)?;
        let precision = self.resolution.precision_for(&bounds)?;
        let grid = Grid::new(bounds, precision)?;
        debug!(
            width = grid.width(),
            height = grid.height(),
            precision,
            "built grid over ({}, {})..({}, {})",
            bounds.min.x,
            bounds.min.y,
            bounds.max.x,
            bounds.max.y
        );
        Ok(grid)
    }
}
