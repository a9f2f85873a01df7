use super::{Point2, Point3, Vector2, TOLERANCE};

/// An axis-aligned bounding box in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb2 {
    /// Creates a box from two corners.
    #[must_use]
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Computes the XY footprint of a set of 3D points.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_points_xy(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(first.xy(), first.xy());
        for p in rest {
            bounds.expand(&p.xy());
        }
        Some(bounds)
    }

    /// Grows the box to include `point`.
    pub fn expand(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = *self;
        merged.expand(&other.min);
        merged.expand(&other.max);
        merged
    }

    /// Width and height of the box.
    #[must_use]
    pub fn extent(&self) -> Vector2 {
        self.max - self.min
    }

    /// Returns `true` if `other` lies inside `self`, allowing [`TOLERANCE`] slack.
    #[must_use]
    pub fn contains_box(&self, other: &Self) -> bool {
        other.min.x >= self.min.x - TOLERANCE
            && other.min.y >= self.min.y - TOLERANCE
            && other.max.x <= self.max.x + TOLERANCE
            && other.max.y <= self.max.y + TOLERANCE
    }
}
