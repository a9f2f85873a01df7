use thiserror::Error;

/// Top-level error type for meshmap.
#[derive(Debug, Error)]
pub enum MeshmapError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors related to building or reading the mesh model.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("degenerate face: {0}")]
    DegenerateFace(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to read mesh: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to grid construction and rasterization.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("mesh has no active geometry")]
    NoActiveGeometry,

    #[error("grid would be empty ({width} x {height}); precision too coarse or mesh flat in one axis")]
    EmptyGrid { width: usize, height: usize },

    #[error("invalid raster parameters: {0}")]
    InvalidParameters(String),

    #[error("rasterization cancelled")]
    Cancelled,
}

/// Errors related to image export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience type alias for results using [`MeshmapError`].
pub type Result<T> = std::result::Result<T, MeshmapError>;
