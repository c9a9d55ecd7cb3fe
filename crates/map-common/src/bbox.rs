//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in map coordinates.
///
/// Coordinate units are whatever the input shape uses (degrees for
/// geographic data, meters for projected data); the pipeline never
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Aspect ratio (width / height). Returns 1.0 for a degenerate box.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height() <= 0.0 {
            return 1.0;
        }
        self.width() / self.height()
    }

    /// Expand the box outward by a fraction of its extent per side.
    ///
    /// `expand_fraction(0.05)` grows each side by 5% of the corresponding
    /// extent, the margin used to keep point densities clear of the grid
    /// edge.
    pub fn expand_fraction(&self, frac: f64) -> BoundingBox {
        let dx = self.width() * frac;
        let dy = self.height() * frac;
        BoundingBox {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Check if this box intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Check if a point is contained within this box (borders inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Bounding box of a coordinate slice. Returns `None` for an empty slice.
    pub fn of_points(points: &[(f64, f64)]) -> Option<BoundingBox> {
        let first = points.first()?;
        let mut bbox = BoundingBox::new(first.0, first.1, first.0, first.1);
        for &(x, y) in &points[1..] {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }
}

impl From<geo::Rect<f64>> for BoundingBox {
    fn from(r: geo::Rect<f64>) -> Self {
        BoundingBox::new(r.min().x, r.min().y, r.max().x, r.max().y)
    }
}
