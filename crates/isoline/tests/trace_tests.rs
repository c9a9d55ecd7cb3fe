//! Tests for the contour tracer.

use isoline::{trace_contours, MAX_CONTOUR_LINES};
use map_common::{BoundingBox, GridSpec, SmoothError, Surface};

fn unit_surface(values: Vec<f64>, n: usize) -> Surface {
    let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), n, n);
    Surface::new(grid, values)
}

#[test]
fn test_only_interior_breaks_are_traced() {
    let values = test_utils::gradient_values(10, 10, 0.0, 3.0);
    let s = unit_surface(values, 10);
    let lines = trace_contours(&s, &[0.0, 1.0, 2.0, 3.0]).unwrap();

    let mut levels: Vec<f64> = lines.iter().map(|l| l.level).collect();
    levels.dedup();
    levels.sort_by(|a, b| a.partial_cmp(b).unwrap());
    levels.dedup();
    assert_eq!(levels, vec![1.0, 2.0]);
}

#[test]
fn test_two_breaks_trace_midpoint() {
    let values = test_utils::gradient_values(10, 10, 0.0, 4.0);
    let s = unit_surface(values, 10);
    let lines = trace_contours(&s, &[0.0, 4.0]).unwrap();
    assert!(lines.iter().all(|l| l.level == 2.0));
}

#[test]
fn test_flat_surface_has_no_contours() {
    let s = unit_surface(vec![1.0; 100], 10);
    let err = trace_contours(&s, &[0.0, 1.0, 2.0]).unwrap_err();
    assert!(matches!(err, SmoothError::NoContoursFound));
}

#[test]
fn test_too_many_contours_rejected() {
    // A fine checkerboard makes every second cell its own component, which
    // blows past the ceiling in one level.
    let n = 160;
    let values: Vec<f64> = (0..n * n)
        .map(|i| {
            let row = i / n;
            let col = i % n;
            if (row + col) % 2 == 0 {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    let s = unit_surface(values, n);
    let err = trace_contours(&s, &[0.0, 0.5, 1.0]).unwrap_err();
    match err {
        SmoothError::TooManyContours { count, limit } => {
            assert!(count > limit);
            assert_eq!(limit, MAX_CONTOUR_LINES);
        }
        other => panic!("expected TooManyContours, got {:?}", other),
    }
}

#[test]
fn test_masked_region_not_traced() {
    let mut values = test_utils::gradient_values(10, 10, 0.0, 3.0);
    // Mask the upper half of the grid.
    for v in values.iter_mut().skip(50) {
        *v = f64::NAN;
    }
    let s = unit_surface(values, 10);
    let lines = trace_contours(&s, &[0.0, 1.0, 2.0, 3.0]).unwrap();
    for line in &lines {
        for &(_, y) in &line.points {
            assert!(y <= 0.5 + 1e-9, "line entered masked half at y={}", y);
        }
    }
}
