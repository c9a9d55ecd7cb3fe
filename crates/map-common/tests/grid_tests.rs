//! Tests for grid and surface types.

use map_common::{BoundingBox, GridSpec, Surface};

// ============================================================================
// GridSpec tests
// ============================================================================

#[test]
fn test_flat_index_row_major() {
    let g = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 3, 4);
    assert_eq!(g.flat_index(0, 0), 0);
    assert_eq!(g.flat_index(0, 3), 3);
    assert_eq!(g.flat_index(1, 0), 4);
    assert_eq!(g.flat_index(2, 3), 11);
}

#[test]
fn test_cell_at_round_trip() {
    let g = GridSpec::new(BoundingBox::new(-10.0, -5.0, 10.0, 5.0), 20, 40);
    for row in [0usize, 7, 19] {
        for col in [0usize, 13, 39] {
            let (x, y) = g.cell_center(row, col);
            assert_eq!(g.cell_at(x, y), Some((row, col)));
        }
    }
}

#[test]
fn test_with_target_cells_minimum_dims() {
    // A degenerate target must still yield a usable grid.
    let g = GridSpec::with_target_cells(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1);
    assert!(g.nrows >= 2);
    assert!(g.ncols >= 2);
}

// ============================================================================
// Surface tests
// ============================================================================

#[test]
fn test_masking_is_value_semantics() {
    let g = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 2, 2);
    let s = Surface::new(g, vec![1.0, 2.0, 3.0, 4.0]);
    let masked = s.masked(&[true, false, true, false]);

    // The original is untouched.
    assert_eq!(s.values, vec![1.0, 2.0, 3.0, 4.0]);
    assert!(masked.values[1].is_nan());
    assert_eq!(masked.total(), 4.0);
}

#[test]
fn test_value_range_skips_missing() {
    let g = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 2, 2);
    let s = Surface::new(g, vec![f64::NAN, 2.0, -1.0, f64::NAN]);
    assert_eq!(s.value_range(), Some((-1.0, 2.0)));

    let all_missing = Surface::new(g, vec![f64::NAN; 4]);
    assert_eq!(all_missing.value_range(), None);
}

#[test]
fn test_normalization_any_resolution() {
    // The same mass normalizes to the same integral on different grids.
    for n in [8usize, 16, 32] {
        let g = GridSpec::new(BoundingBox::new(0.0, 0.0, 2.0, 2.0), n, n);
        let s = Surface::new(g, (0..g.len()).map(|i| (i % 7) as f64).collect());
        let normalized = s.normalized_to(123.0);
        assert!((normalized.integral() - 123.0).abs() < 1e-9);
    }
}
