use super::face::FaceData;

slotmap::new_key_type! {
    /// Unique identifier for an object in the mesh store.
    pub struct ObjectId;
}

/// A named group of faces.
///
/// Inactive objects stay in the store but are ignored by bounding-box
/// queries and rasterization.
#[derive(Debug, Clone)]
pub struct ObjectData {
    /// Object name as given by the input file.
    pub name: String,
    /// Faces in input order.
    pub faces: Vec<FaceData>,
    /// Whether the object takes part in bounding-box and raster passes.
    pub active: bool,
}

impl ObjectData {
    /// Creates an active object with no faces.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
            active: true,
        }
    }

    /// Creates an active object from a list of faces.
    #[must_use]
    pub fn with_faces(name: impl Into<String>, faces: Vec<FaceData>) -> Self {
        Self {
            name: name.into(),
            faces,
            active: true,
        }
    }
}
