mod grayscale;

pub use grayscale::{ExportGrayscale, ExportParams};
