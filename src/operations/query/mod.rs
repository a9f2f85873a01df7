mod bounding_box;

pub use bounding_box::MeshBoundingBox;
