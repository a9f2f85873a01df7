use tracing::{debug, warn};

use crate::grid::Grid;

/// Outcome of a normalization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// Valid heights were mapped linearly from `[min, max]` onto `[0, 1]`.
    Scaled { min: f64, max: f64 },
    /// Every valid cell had the same height `value`; all were set to 0.
    Flat { value: f64 },
    /// The grid had no valid cell.
    Empty,
}

/// Rescales the valid heights of a grid into `[0, 1]`.
///
/// Runs once after rasterization. A grid that is already normalized is left
/// unchanged, and a flat surface maps to 0 rather than dividing by zero.
#[derive(Debug, Default)]
pub struct Normalize;

impl Normalize {
    /// Creates a new `Normalize` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the pass in place.
    pub fn execute(&self, grid: &mut Grid) -> Normalization {
        let Some((min, max)) = grid.height_range() else {
            debug!("normalize: grid has no valid cells");
            return Normalization::Empty;
        };

        let delta = max - min;
        if delta == 0.0 {
            warn!(value = min, "flat surface, all valid cells map to 0");
            for z in grid.valid_heights_mut() {
                *z = 0.0;
            }
            return Normalization::Flat { value: min };
        }

        for z in grid.valid_heights_mut() {
            *z = (*z - min) / delta;
        }
        debug!(min, max, "normalized heights");
        Normalization::Scaled { min, max }
    }
}
