//! Seam buffering for non-degenerate polygon subtraction.
//!
//! Subtracting zero-width contour lines from a polygon is not a defined
//! boolean operation, and subtracting lines buffered to exactly the
//! contour would leave sliver artifacts. Both the cover and the line set
//! are therefore widened by a tiny seam before the difference, a width
//! proportional to the cover extent so it scales with any coordinate unit.

use geo::{BooleanOps, LineString, MultiPolygon, Polygon};
use map_common::BoundingBox;

/// Relative seam width: cover extent divided by this gives the buffer
/// distance.
const SEAM_DIVISOR: f64 = 1e9;

/// Seam width for a cover with the given bounding box.
pub fn seam_width(cover_bbox: &BoundingBox) -> f64 {
    cover_bbox.width().max(cover_bbox.height()) / SEAM_DIVISOR
}

/// Buffer a set of polylines into thin strip polygons of half-width `w`.
///
/// Each segment becomes a quad offset by the segment normal; square caps
/// at every vertex bridge the joints. The strips are unioned into one
/// multi-polygon. This is a positive approximate buffer, which is all the
/// seam needs: the width is far below visible scale.
pub fn buffer_lines(lines: &[Vec<(f64, f64)>], w: f64) -> MultiPolygon<f64> {
    let mut pieces: Vec<MultiPolygon<f64>> = Vec::new();

    for line in lines {
        for seg in line.windows(2) {
            if let Some(quad) = segment_quad(seg[0], seg[1], w) {
                pieces.push(MultiPolygon(vec![quad]));
            }
        }
        for &(x, y) in line.iter() {
            pieces.push(MultiPolygon(vec![square_cap(x, y, w)]));
        }
    }

    union_all(pieces)
}

/// Buffer a polygon outward by `w`: the polygon unioned with buffered
/// copies of all its rings.
pub fn buffer_polygon(polygon: &MultiPolygon<f64>, w: f64) -> MultiPolygon<f64> {
    let mut rings: Vec<Vec<(f64, f64)>> = Vec::new();
    for poly in polygon {
        rings.push(poly.exterior().coords().map(|c| (c.x, c.y)).collect());
        for interior in poly.interiors() {
            rings.push(interior.coords().map(|c| (c.x, c.y)).collect());
        }
    }
    let ring_strips = buffer_lines(&rings, w);
    polygon.union(&ring_strips)
}

/// The quad polygon of one segment offset by its normal, or `None` for a
/// degenerate (zero-length) segment.
fn segment_quad(p1: (f64, f64), p2: (f64, f64), w: f64) -> Option<Polygon<f64>> {
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let nx = -dy / len * w;
    let ny = dx / len * w;
    Some(Polygon::new(
        LineString::from(vec![
            (p1.0 + nx, p1.1 + ny),
            (p2.0 + nx, p2.1 + ny),
            (p2.0 - nx, p2.1 - ny),
            (p1.0 - nx, p1.1 - ny),
            (p1.0 + nx, p1.1 + ny),
        ]),
        vec![],
    ))
}

fn square_cap(x: f64, y: f64, w: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x - w, y - w),
            (x + w, y - w),
            (x + w, y + w),
            (x - w, y + w),
            (x - w, y - w),
        ]),
        vec![],
    )
}

/// Union a list of multi-polygons with balanced pairwise reduction, which
/// keeps intermediate results small compared to a linear fold.
pub(crate) fn union_all(mut pieces: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    if pieces.is_empty() {
        return MultiPolygon(vec![]);
    }
    while pieces.len() > 1 {
        let mut next = Vec::with_capacity(pieces.len() / 2 + 1);
        let mut iter = pieces.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(a.union(&b)),
                None => next.push(a),
            }
        }
        pieces = next;
    }
    pieces.pop().expect("non-empty after reduction")
}
