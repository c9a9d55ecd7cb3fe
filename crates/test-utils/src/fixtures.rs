//! Common polygon fixtures used across the test suite.

use geo::{polygon, Polygon};

/// An axis-aligned rectangle polygon.
pub fn rect_polygon(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
    polygon![
        (x: min_x, y: min_y),
        (x: max_x, y: min_y),
        (x: max_x, y: max_y),
        (x: min_x, y: max_y),
    ]
}

/// The unit square.
pub fn unit_square() -> Polygon<f64> {
    rect_polygon(0.0, 0.0, 1.0, 1.0)
}

/// An L-shaped polygon inside the unit square, for concave-cover cases.
pub fn l_shape() -> Polygon<f64> {
    polygon![
        (x: 0.0, y: 0.0),
        (x: 1.0, y: 0.0),
        (x: 1.0, y: 0.4),
        (x: 0.4, y: 0.4),
        (x: 0.4, y: 1.0),
        (x: 0.0, y: 1.0),
    ]
}

/// A square ring: unit square with a centered square hole.
pub fn square_with_hole() -> Polygon<f64> {
    let mut p = unit_square();
    p.interiors_push(geo::LineString::from(vec![
        (0.3, 0.3),
        (0.3, 0.7),
        (0.7, 0.7),
        (0.7, 0.3),
        (0.3, 0.3),
    ]));
    p
}
