use std::path::Path;

use image::{GrayImage, Luma};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::grid::{Grid, GridIndex};

/// Parameters controlling image export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportParams {
    /// Gray level for cells no face covered.
    pub background: u8,
}

/// Renders a normalized grid as an 8-bit grayscale image.
///
/// Valid cells map to `round(z * 255)`, clamped to `0..=255`; invalid cells
/// take the background level. Image row 0 is the grid's top row (largest
/// `j`), since image rows grow downwards while grid Y grows upwards.
#[derive(Debug, Default)]
pub struct ExportGrayscale {
    params: ExportParams,
}

impl ExportGrayscale {
    /// Creates a new `ExportGrayscale` operation.
    #[must_use]
    pub fn new(params: ExportParams) -> Self {
        Self { params }
    }

    /// Executes the export, returning the image.
    #[must_use]
    pub fn execute(&self, grid: &Grid) -> GrayImage {
        let width = u32::try_from(grid.width()).unwrap_or(u32::MAX);
        let height = u32::try_from(grid.height()).unwrap_or(u32::MAX);
        GrayImage::from_fn(width, height, |x, y| {
            let index = GridIndex::new(x as usize, grid.height() - 1 - y as usize);
            Luma([grid
                .height_at(index)
                .map_or(self.params.background, gray_level)])
        })
    }

    /// Exports the grid and writes it as PNG to `path`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Image` if encoding or writing fails.
    pub fn save(&self, grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.execute(grid)
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(ExportError::from)?;
        debug!(path = %path.display(), "wrote heatmap image");
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gray_level(z: f64) -> u8 {
    (z * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Aabb2, Point2};

    fn grid_3x2() -> Grid {
        Grid::new(
            Aabb2::new(Point2::new(0.0, 0.0), Point2::new(3.0, 2.0)),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn levels_round_and_clamp() {
        assert_eq!(gray_level(0.0), 0);
        assert_eq!(gray_level(1.0), 255);
        assert_eq!(gray_level(0.5), 128);
        assert_eq!(gray_level(0.2), 51);
        assert_eq!(gray_level(1.5), 255);
        assert_eq!(gray_level(-0.1), 0);
    }

    #[test]
    fn image_is_flipped_vertically() {
        let mut grid = grid_3x2();
        grid.set_height(GridIndex::new(0, 0), 1.0);
        grid.set_height(GridIndex::new(2, 1), 0.5);
        let img = ExportGrayscale::default().execute(&grid);
        assert_eq!(img.dimensions(), (3, 2));
        // Grid row 0 is the bottom image row.
        assert_eq!(img.get_pixel(0, 1).0, [255]);
        assert_eq!(img.get_pixel(2, 0).0, [128]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
    }

    #[test]
    fn invalid_cells_use_background() {
        let mut grid = grid_3x2();
        grid.set_height(GridIndex::new(1, 1), 0.0);
        let img = ExportGrayscale::new(ExportParams { background: 7 }).execute(&grid);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
        assert_eq!(img.get_pixel(0, 0).0, [7]);
        assert_eq!(img.get_pixel(2, 1).0, [7]);
    }

    #[test]
    fn save_writes_png() {
        let mut grid = grid_3x2();
        grid.set_height(GridIndex::new(0, 0), 1.0);
        let path = std::env::temp_dir().join(format!("meshmap-export-{}.png", std::process::id()));
        ExportGrayscale::default().save(&grid, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
