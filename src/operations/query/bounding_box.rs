use crate::error::{RasterError, Result};
use crate::math::Aabb2;
use crate::mesh::MeshStore;

/// Computes the XY bounding box of all faces of active objects.
#[derive(Debug, Default)]
pub struct MeshBoundingBox;

impl MeshBoundingBox {
    /// Creates a new `MeshBoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query, returning the XY box.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::NoActiveGeometry` if no active object has a face.
    pub fn execute(&self, store: &MeshStore) -> Result<Aabb2> {
        store
            .active_faces()
            .map(|face| face.bounds())
            .reduce(|acc, b| acc.union(&b))
            .ok_or_else(|| RasterError::NoActiveGeometry.into())
    }
}
