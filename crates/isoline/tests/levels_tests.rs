//! Tests for classification and level selection.

use isoline::{class_breaks, select_levels, ClassifyStyle};
use map_common::{BoundingBox, GridSpec, SmoothError, Surface};

fn surface_with(values: Vec<f64>, n: usize) -> Surface {
    let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), n, n);
    Surface::new(grid, values)
}

// ============================================================================
// class_breaks tests
// ============================================================================

#[test]
fn test_all_styles_strictly_increasing() {
    let values: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin() * 50.0 + 50.0).collect();
    for style in [
        ClassifyStyle::Equal,
        ClassifyStyle::Quantile,
        ClassifyStyle::Pretty,
        ClassifyStyle::Kmeans,
    ] {
        let breaks = class_breaks(&values, 5, style, None).unwrap();
        assert!(breaks.len() >= 2, "style {:?}", style);
        for w in breaks.windows(2) {
            assert!(w[1] > w[0], "style {:?} breaks not increasing", style);
        }
    }
}

#[test]
fn test_breaks_bracket_data_range() {
    let values = vec![3.0, 7.0, 12.0, 18.0, 25.0];
    for style in [
        ClassifyStyle::Equal,
        ClassifyStyle::Quantile,
        ClassifyStyle::Pretty,
        ClassifyStyle::Kmeans,
    ] {
        let breaks = class_breaks(&values, 4, style, None).unwrap();
        assert!(breaks[0] <= 3.0, "style {:?}", style);
        assert!(*breaks.last().unwrap() >= 25.0, "style {:?}", style);
    }
}

#[test]
fn test_quantile_handles_ties() {
    // Heavily tied sample: duplicate quantiles must be deduplicated, not
    // returned as a non-increasing sequence.
    let mut values = vec![1.0; 90];
    values.extend(vec![2.0; 10]);
    let breaks = class_breaks(&values, 5, ClassifyStyle::Quantile, None).unwrap();
    for w in breaks.windows(2) {
        assert!(w[1] > w[0]);
    }
}

#[test]
fn test_constant_surface_rejected() {
    let err = class_breaks(&[4.0; 20], 5, ClassifyStyle::Equal, None).unwrap_err();
    assert!(matches!(err, SmoothError::InvalidBreaks(_)));
}

// ============================================================================
// select_levels tests
// ============================================================================

#[test]
fn test_explicit_breaks_force_fixed() {
    let s = surface_with(vec![0.0, 1.0, 2.0, 3.0], 2);
    // Style says quantile, but explicit breaks win and are used verbatim.
    let breaks =
        select_levels(&s, 5, ClassifyStyle::Quantile, Some(&[0.0, 1.0, 2.0, 3.0])).unwrap();
    assert_eq!(breaks, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_explicit_breaks_validated() {
    let s = surface_with(vec![0.0, 1.0, 2.0, 3.0], 2);
    let err = select_levels(&s, 5, ClassifyStyle::Equal, Some(&[3.0, 1.0])).unwrap_err();
    assert!(matches!(err, SmoothError::InvalidBreaks(_)));
}

#[test]
fn test_missing_values_excluded_from_classification() {
    let s = surface_with(vec![0.0, 10.0, f64::NAN, f64::NAN], 2);
    let breaks = select_levels(&s, 2, ClassifyStyle::Equal, None).unwrap();
    assert_eq!(breaks, vec![0.0, 5.0, 10.0]);
}
