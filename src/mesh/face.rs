use crate::error::MeshError;
use crate::math::polygon_2d::point_in_polygon_xy;
use crate::math::{Aabb2, Point2, Point3, Vector3, TOLERANCE};

/// A planar polygon of the mesh.
///
/// The vertex loop is closed implicitly (the last vertex connects back to
/// the first) and is assumed coplanar. One normal is shared by the whole
/// face; it does not have to be unit length.
#[derive(Debug, Clone)]
pub struct FaceData {
    vertices: Vec<Point3>,
    normal: Vector3,
}

impl FaceData {
    /// Creates a face from its vertex loop and normal.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::DegenerateFace` if fewer than three vertices are
    /// given, a vertex coordinate is not finite, or the normal is zero or
    /// not finite.
    pub fn new(vertices: Vec<Point3>, normal: Vector3) -> Result<Self, MeshError> {
        if vertices.len() < 3 {
            return Err(MeshError::DegenerateFace(format!(
                "face has {} vertices, at least 3 are required",
                vertices.len()
            )));
        }
        if let Some(v) = vertices.iter().find(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(MeshError::DegenerateFace(format!(
                "face vertex ({}, {}, {}) is not finite",
                v.x, v.y, v.z
            )));
        }
        let len = normal.norm();
        if !len.is_finite() || len < TOLERANCE {
            return Err(MeshError::DegenerateFace(format!(
                "face normal ({}, {}, {}) is degenerate",
                normal.x, normal.y, normal.z
            )));
        }
        Ok(Self { vertices, normal })
    }

    /// The vertex loop.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// The face normal.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Bounding box of the face in the XY plane.
    #[must_use]
    pub fn bounds(&self) -> Aabb2 {
        // Construction guarantees at least three vertices.
        let first = self.vertices[0].xy();
        let mut bounds = Aabb2::new(first, first);
        for v in &self.vertices[1..] {
            bounds.expand(&v.xy());
        }
        bounds
    }

    /// Even-odd containment test against the face's XY projection.
    #[must_use]
    pub fn contains_xy(&self, point: &Point2) -> bool {
        point_in_polygon_xy(&self.vertices, point)
    }

    /// Height of the face's plane above `point`.
    ///
    /// Returns `None` for a vertical face, whose plane has no single height
    /// over the XY plane, and when the height overflows.
    #[must_use]
    pub fn height_at(&self, point: &Point2) -> Option<f64> {
        let n = &self.normal;
        if n.z.abs() < TOLERANCE {
            return None;
        }
        let v0 = &self.vertices[0];
        let z = v0.z + ((v0.x - point.x) * n.x + (v0.y - point.y) * n.y) / n.z;
        z.is_finite().then_some(z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_square(z: f64) -> FaceData {
        FaceData::new(
            vec![
                Point3::new(0.0, 0.0, z),
                Point3::new(10.0, 0.0, z),
                Point3::new(10.0, 10.0, z),
                Point3::new(0.0, 10.0, z),
            ],
            Vector3::new(0.0, 0.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn rejects_too_few_vertices() {
        let res = FaceData::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            Vector3::z(),
        );
        assert!(matches!(res, Err(MeshError::DegenerateFace(_))));
    }

    #[test]
    fn rejects_zero_normal() {
        let res = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vector3::zeros(),
        );
        assert!(matches!(res, Err(MeshError::DegenerateFace(_))));
    }

    #[test]
    fn rejects_nan_normal() {
        let res = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vector3::new(f64::NAN, 0.0, 1.0),
        );
        assert!(res.is_err());
        let res = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vector3::new(0.0, f64::INFINITY, 1.0),
        );
        assert!(matches!(res, Err(MeshError::DegenerateFace(_))));
    }

    #[test]
    fn rejects_non_finite_vertex() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let res = FaceData::new(
                vec![
                    Point3::new(2.0, 2.0, bad),
                    Point3::new(8.0, 2.0, 0.0),
                    Point3::new(8.0, 8.0, 0.0),
                ],
                Vector3::z(),
            );
            assert!(matches!(res, Err(MeshError::DegenerateFace(_))));
        }
    }

    #[test]
    fn bounds_of_square() {
        let b = flat_square(0.0).bounds();
        assert_eq!(b.min, Point2::new(0.0, 0.0));
        assert_eq!(b.max, Point2::new(10.0, 10.0));
    }

    #[test]
    fn contains_square_points() {
        let f = flat_square(0.0);
        assert!(f.contains_xy(&Point2::new(5.0, 5.0)));
        assert!(!f.contains_xy(&Point2::new(15.0, 5.0)));
    }

    #[test]
    fn flat_face_height_is_constant() {
        let f = flat_square(3.0);
        assert_relative_eq!(f.height_at(&Point2::new(5.0, 5.0)).unwrap(), 3.0);
        assert_relative_eq!(f.height_at(&Point2::new(1.25, 8.5)).unwrap(), 3.0);
    }

    #[test]
    fn sloped_face_follows_plane() {
        // Plane z = x, normal (-1, 0, 1).
        let f = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 4.0),
                Point3::new(4.0, 4.0, 4.0),
                Point3::new(0.0, 4.0, 0.0),
            ],
            Vector3::new(-1.0, 0.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(f.height_at(&Point2::new(1.0, 2.0)).unwrap(), 1.0);
        assert_relative_eq!(f.height_at(&Point2::new(3.5, 0.5)).unwrap(), 3.5);
    }

    #[test]
    fn sloped_face_unnormalized_normal() {
        // Plane z = 2 + 0.5 y, any scale of the normal works.
        let f = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 2.0),
                Point3::new(2.0, 0.0, 2.0),
                Point3::new(2.0, 2.0, 3.0),
            ],
            Vector3::new(0.0, -1.0, 2.0),
        )
        .unwrap();
        assert_relative_eq!(f.height_at(&Point2::new(1.0, 1.0)).unwrap(), 2.5);
    }

    #[test]
    fn vertical_face_has_no_height() {
        let f = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
            ],
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(f.height_at(&Point2::new(0.5, 0.0)).is_none());
    }

    #[test]
    fn overflowing_height_is_none() {
        let f = FaceData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vector3::new(1e150, 0.0, 1e-9),
        )
        .unwrap();
        assert!(f.height_at(&Point2::new(-1e300, 0.0)).is_none());
    }
}
