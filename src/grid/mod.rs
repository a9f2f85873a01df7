mod axis;

pub use axis::GridAxis;

use crate::error::RasterError;
use crate::math::{Aabb2, Point2, Vector2};

/// Upper bound on the number of cells a grid may allocate.
pub const MAX_CELLS: usize = 1 << 28;

/// Integer cell coordinates `(i, j)`; `i` runs along X, `j` along Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    /// Column index.
    pub i: usize,
    /// Row index.
    pub j: usize,
}

impl GridIndex {
    /// Creates a new index.
    #[must_use]
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

/// Read view of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// World-space XY position of the sample.
    pub position: Point2,
    /// Sampled height, `None` until a face has been written here.
    pub height: Option<f64>,
}

impl Cell {
    /// Returns `true` if a height has been written.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.height.is_some()
    }
}

/// Dense 2D lattice of height samples over a rectangular XY footprint.
///
/// Sample positions are fixed at construction; only heights change. Heights
/// are stored row-major (`j * width + i`).
#[derive(Debug, Clone)]
pub struct Grid {
    bounds: Aabb2,
    x_axis: GridAxis,
    y_axis: GridAxis,
    heights: Vec<Option<f64>>,
}

impl Grid {
    /// Builds a grid covering `bounds` with roughly `precision` world units
    /// between samples.
    ///
    /// Each axis gets `floor(extent / precision)` samples spread from the
    /// minimum to the maximum corner inclusive.
    ///
    /// # Errors
    ///
    /// - `RasterError::InvalidParameters` if `precision` is not a positive
    ///   finite number or the grid would exceed [`MAX_CELLS`]
    /// - `RasterError::EmptyGrid` if either axis ends up with no samples
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(bounds: Aabb2, precision: f64) -> Result<Self, RasterError> {
        if !precision.is_finite() || precision <= 0.0 {
            return Err(RasterError::InvalidParameters(format!(
                "precision must be a positive number, got {precision}"
            )));
        }
        let extent = bounds.extent();
        let columns = (extent.x / precision).floor();
        let rows = (extent.y / precision).floor();
        if !columns.is_finite() || !rows.is_finite() || columns * rows > MAX_CELLS as f64 {
            return Err(RasterError::InvalidParameters(format!(
                "precision {precision} yields a {columns} x {rows} grid, limit is {MAX_CELLS} cells"
            )));
        }
        let width = columns.max(0.0) as usize;
        let height = rows.max(0.0) as usize;
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyGrid { width, height });
        }

        Ok(Self {
            bounds,
            x_axis: GridAxis::new(bounds.min.x, bounds.max.x, width),
            y_axis: GridAxis::new(bounds.min.y, bounds.max.y, height),
            heights: vec![None; width * height],
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.x_axis.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.y_axis.len()
    }

    /// World-space footprint of the grid.
    #[must_use]
    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    /// Distance between adjacent samples along X and Y.
    #[must_use]
    pub fn step(&self) -> Vector2 {
        Vector2::new(self.x_axis.step(), self.y_axis.step())
    }

    /// World position of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    #[must_use]
    pub fn position(&self, index: GridIndex) -> Point2 {
        self.assert_in_range(index);
        Point2::new(self.x_axis.coord(index.i), self.y_axis.coord(index.j))
    }

    /// Returns the cell at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    #[must_use]
    pub fn cell(&self, index: GridIndex) -> Cell {
        let offset = self.offset(index);
        Cell {
            position: Point2::new(self.x_axis.coord(index.i), self.y_axis.coord(index.j)),
            height: self.heights[offset],
        }
    }

    /// Height stored at `index`, `None` if never written.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    #[must_use]
    pub fn height_at(&self, index: GridIndex) -> Option<f64> {
        self.heights[self.offset(index)]
    }

    /// Writes a height and marks the cell valid.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    pub fn set_height(&mut self, index: GridIndex, z: f64) {
        let offset = self.offset(index);
        self.heights[offset] = Some(z);
    }

    /// Per axis, the largest index whose sample coordinate is `<=` the
    /// query, clamped to 0 below the grid.
    #[must_use]
    pub fn floor_index(&self, point: &Point2) -> GridIndex {
        GridIndex::new(
            self.x_axis.floor_index(point.x),
            self.y_axis.floor_index(point.y),
        )
    }

    /// Per axis, the smallest index whose sample coordinate is `>=` the
    /// query, clamped to the last index above the grid.
    #[must_use]
    pub fn ceil_index(&self, point: &Point2) -> GridIndex {
        GridIndex::new(
            self.x_axis.ceil_index(point.x),
            self.y_axis.ceil_index(point.y),
        )
    }

    /// Number of cells that hold a height.
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.heights.iter().filter(|h| h.is_some()).count()
    }

    /// Minimum and maximum over valid heights, `None` if no cell is valid.
    #[must_use]
    pub fn height_range(&self) -> Option<(f64, f64)> {
        self.heights.iter().flatten().fold(None, |acc, &z| match acc {
            None => Some((z, z)),
            Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
        })
    }

    /// Mutable access to every valid height.
    pub(crate) fn valid_heights_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.heights.iter_mut().flatten()
    }

    /// Iterates over all cells, row by row from `j = 0`.
    pub fn cells(&self) -> impl Iterator<Item = (GridIndex, Cell)> + '_ {
        let width = self.width();
        self.heights.iter().enumerate().map(move |(offset, &height)| {
            let index = GridIndex::new(offset % width, offset / width);
            let position = Point2::new(self.x_axis.coord(index.i), self.y_axis.coord(index.j));
            (index, Cell { position, height })
        })
    }

    fn offset(&self, index: GridIndex) -> usize {
        self.assert_in_range(index);
        index.j * self.width() + index.i
    }

    fn assert_in_range(&self, index: GridIndex) {
        assert!(
            index.i < self.width() && index.j < self.height(),
            "grid index ({}, {}) out of range for {} x {} grid",
            index.i,
            index.j,
            self.width(),
            self.height()
        );
    }
}
