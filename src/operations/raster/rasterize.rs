use tracing::{debug, warn};

use crate::error::{RasterError, Result};
use crate::grid::{Grid, GridIndex};
use crate::mesh::{FaceData, MeshStore};

use super::{CancelToken, NoProgress, ProgressSink, RasterParams, RasterProgress};

/// Summary of a raster pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterReport {
    /// Faces whose candidate cells were tested.
    pub faces_rasterized: usize,
    /// Faces rejected because they reach outside the grid.
    pub faces_skipped: usize,
    /// Candidate cells tested against a face.
    pub cells_tested: u64,
    /// Cell writes that raised (or first set) a height.
    pub cells_written: u64,
}

/// Writes the top-most surface height of every active face into a grid.
///
/// Each face is narrowed to the rectangle of cells around its XY bounding
/// box. A cell inside the face (even-odd rule) takes the face's plane height
/// when it has no height yet or the new height is strictly greater, so the
/// result does not depend on face order. Vertical faces cover no cells.
#[derive(Debug, Default)]
pub struct Rasterize {
    params: RasterParams,
}

impl Rasterize {
    /// Creates a new `Rasterize` operation.
    #[must_use]
    pub fn new(params: RasterParams) -> Self {
        Self { params }
    }

    /// Executes the pass without progress reporting or cancellation.
    ///
    /// # Errors
    ///
    /// See [`Rasterize::execute_with`]; without a cancel token this does not
    /// fail.
    pub fn execute(&self, store: &MeshStore, grid: &mut Grid) -> Result<RasterReport> {
        self.execute_with(store, grid, &mut NoProgress, &CancelToken::new())
    }

    /// Executes the pass, reporting progress to `progress` and checking
    /// `cancel` before each face.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::Cancelled` if `cancel` was triggered. The grid
    /// then holds the heights written so far.
    pub fn execute_with(
        &self,
        store: &MeshStore,
        grid: &mut Grid,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RasterReport> {
        let cells_total: u64 = store
            .active_faces()
            .filter_map(|face| candidate_rect(grid, face))
            .map(|(lo, hi)| rect_area(lo, hi))
            .sum();
        debug!(cells_total, "rasterizing");

        let mut report = RasterReport::default();
        let mut tick = 0;
        for face in store.active_faces() {
            if cancel.is_cancelled() {
                warn!(
                    cells_processed = report.cells_tested,
                    cells_total, "rasterization cancelled"
                );
                return Err(RasterError::Cancelled.into());
            }

            let Some((lo, hi)) = candidate_rect(grid, face) else {
                warn!(
                    vertices = face.vertices().len(),
                    "skipping face outside the grid bounds"
                );
                report.faces_skipped += 1;
                continue;
            };
            report.faces_rasterized += 1;

            for j in lo.j..=hi.j {
                for i in lo.i..=hi.i {
                    let index = GridIndex::new(i, j);
                    if composite(grid, face, index) {
                        report.cells_written += 1;
                    }
                    report.cells_tested += 1;
                    tick += 1;
                    if tick == self.params.progress_interval {
                        tick = 0;
                        progress.report(RasterProgress {
                            cells_processed: report.cells_tested,
                            cells_total,
                        });
                    }
                }
            }
        }

        progress.report(RasterProgress {
            cells_processed: report.cells_tested,
            cells_total,
        });
        debug!(
            faces = report.faces_rasterized,
            skipped = report.faces_skipped,
            written = report.cells_written,
            "rasterization finished"
        );
        Ok(report)
    }
}

/// Inclusive cell rectangle that covers the face's bounding box, or `None`
/// if the face reaches outside the grid.
fn candidate_rect(grid: &Grid, face: &FaceData) -> Option<(GridIndex, GridIndex)> {
    let bounds = face.bounds();
    if !grid.bounds().contains_box(&bounds) {
        return None;
    }
    Some((grid.floor_index(&bounds.min), grid.ceil_index(&bounds.max)))
}

fn rect_area(lo: GridIndex, hi: GridIndex) -> u64 {
    ((hi.i - lo.i + 1) * (hi.j - lo.j + 1)) as u64
}

/// Applies the max-height rule for one face at one cell. Returns `true` if
/// the cell was written.
fn composite(grid: &mut Grid, face: &FaceData, index: GridIndex) -> bool {
    let cell = grid.cell(index);
    if !face.contains_xy(&cell.position) {
        return false;
    }
    let Some(z) = face.height_at(&cell.position) else {
        return false;
    };
    if cell.height.is_some_and(|old| z <= old) {
        return false;
    }
    grid.set_height(index, z);
    true
}
