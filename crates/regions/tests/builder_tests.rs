//! Tests for dasymetric region construction.

use geo::{Area, BooleanOps, Contains, MultiPolygon};
use isoline::trace_contours;
use map_common::{BoundingBox, GridSpec, SmoothError, Surface};
use regions::build_regions;
use test_utils::{peak_values, unit_square};

fn peak_surface(n: usize) -> Surface {
    let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), n, n);
    Surface::new(grid, peak_values(n, n, 10.0))
}

fn unit_cover() -> MultiPolygon<f64> {
    MultiPolygon(vec![unit_square()])
}

// ============================================================================
// partition and banding
// ============================================================================

#[test]
fn test_regions_partition_cover_up_to_seam() {
    let s = peak_surface(30);
    let breaks = vec![0.0, 2.5, 5.0, 7.5, 10.0];
    let lines = trace_contours(&s, &breaks).unwrap();
    let bands = build_regions(&unit_cover(), &lines, &s, &breaks).unwrap();

    let total: f64 = bands.iter().map(|b| b.geometry.unsigned_area()).sum();
    // The union of bands equals the cover area up to the seam width.
    assert!((total - 1.0).abs() < 1e-4, "total band area {}", total);

    // No two bands overlap beyond the seam.
    for i in 0..bands.len() {
        for j in (i + 1)..bands.len() {
            let overlap = bands[i]
                .geometry
                .intersection(&bands[j].geometry)
                .unsigned_area();
            assert!(overlap < 1e-4, "bands {} and {} overlap by {}", i, j, overlap);
        }
    }
}

#[test]
fn test_band_labels_cover_all_regions() {
    let s = peak_surface(30);
    let breaks = vec![0.0, 2.5, 5.0, 7.5, 10.0];
    let lines = trace_contours(&s, &breaks).unwrap();
    let bands = build_regions(&unit_cover(), &lines, &s, &breaks).unwrap();

    assert!(!bands.is_empty());
    assert!(bands.len() <= 4);
    for band in &bands {
        assert!(band.band_index < 4);
        // The aggregate value lies in (or clamps into) the band.
        assert!(band.value <= band.band.upper + 2.5);
    }
    // Band indices are unique and sorted.
    for w in bands.windows(2) {
        assert!(w[0].band_index < w[1].band_index);
    }
}

#[test]
fn test_values_increase_toward_peak() {
    let s = peak_surface(30);
    let breaks = vec![0.0, 2.5, 5.0, 7.5, 10.0];
    let lines = trace_contours(&s, &breaks).unwrap();
    let bands = build_regions(&unit_cover(), &lines, &s, &breaks).unwrap();

    for w in bands.windows(2) {
        assert!(w[0].value < w[1].value);
    }
}

// ============================================================================
// hole nesting
// ============================================================================

#[test]
fn test_outer_band_has_hole_where_inner_band_sits() {
    let s = peak_surface(40);
    let breaks = vec![0.0, 5.0, 10.0];
    let lines = trace_contours(&s, &breaks).unwrap();
    let bands = build_regions(&unit_cover(), &lines, &s, &breaks).unwrap();
    assert_eq!(bands.len(), 2);

    let outer = &bands[0];
    let inner = &bands[1];

    // The low band is an annulus: its polygon carries an interior ring.
    let has_hole = outer.geometry.iter().any(|p| !p.interiors().is_empty());
    assert!(has_hole, "outer band should have a hole for the inner band");

    // The inner band sits inside that hole, not inside the outer solid.
    let probe = inner
        .geometry
        .iter()
        .next()
        .and_then(geo::InteriorPoint::interior_point)
        .expect("inner band has an interior point");
    assert!(!outer.geometry.contains(&probe));
}

// ============================================================================
// degenerate input
// ============================================================================

#[test]
fn test_empty_cover_is_all_holes() {
    let s = peak_surface(10);
    let breaks = vec![0.0, 5.0, 10.0];
    let lines = trace_contours(&s, &breaks).unwrap();
    let err = build_regions(&MultiPolygon(vec![]), &lines, &s, &breaks).unwrap_err();
    assert!(matches!(err, SmoothError::AllHoles));
}

#[test]
fn test_no_lines_single_band() {
    // With no contour lines the whole cover is one region in one band.
    let s = peak_surface(10);
    let breaks = vec![0.0, 5.0, 10.0];
    let bands = build_regions(&unit_cover(), &[], &s, &breaks).unwrap();
    assert_eq!(bands.len(), 1);
    assert!((bands[0].geometry.unsigned_area() - 1.0).abs() < 1e-4);
}
