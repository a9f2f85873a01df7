use super::{Point2, Point3, Vector3};

/// Even-odd containment test of `point` against the XY projection of a
/// closed polygon loop.
///
/// A horizontal ray is cast from `point` towards +X; every edge whose
/// endpoints straddle `point.y` and whose crossing lies at or beyond
/// `point.x` toggles the result. Winding order does not matter. Points on
/// the boundary get a deterministic but unspecified answer.
#[must_use]
pub fn point_in_polygon_xy(points: &[Point3], point: &Point2) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &points[i];
        let b = &points[j];
        if (a.y >= point.y) != (b.y >= point.y) {
            // The straddle check guarantees b.y != a.y.
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x <= x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Computes a polygon normal with Newell's method.
///
/// The result is not normalized and is zero for degenerate loops.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}
