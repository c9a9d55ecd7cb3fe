//! End-to-end tests of the smoothing pipeline.

use geo::Area;
use map_common::{BoundingBox, Geometry, GridData, GridSpec, PointSet, SmoothError, Surface};
use smooth_map::{smooth_surface, ClassifyStyle, CoverStrategy, SmoothOptions};
use test_utils::{bimodal_points, gradient_values, random_unit_points, rect_polygon};

fn grid_geometry(values: Vec<f64>, nrows: usize, ncols: usize) -> Geometry {
    let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), nrows, ncols);
    Geometry::Grid(GridData {
        surface: Surface::new(grid, values),
    })
}

// ============================================================================
// Point density, rect cover
// ============================================================================

#[test]
fn test_point_density_produces_all_artifacts() {
    let geom = Geometry::Points(PointSet::new(random_unit_points(100, 42)));
    let opts = SmoothOptions {
        target_cells: 2_500,
        level_count: 5,
        style: Some(ClassifyStyle::Equal),
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();

    // Points default to a rect cover spanning the whole grid.
    assert_eq!(out.cover.resolution.strategy, CoverStrategy::Rect);
    assert_eq!(out.cover.resolution.reason, "default-points");
    assert_eq!(out.cover.mask_count(), out.cover.mask.len());

    let raster = out.raster.as_ref().unwrap();
    assert!(raster.values.iter().all(|v| v.is_finite()));

    // Five equal classes mean six breaks and contours only at the four
    // interior ones.
    assert_eq!(out.breaks.len(), 6);
    let interior = &out.breaks[1..5];
    let contours = out.contours.as_ref().unwrap();
    assert!(!contours.is_empty());
    for line in contours {
        assert!(
            interior.iter().any(|&b| (line.level - b).abs() < 1e-12),
            "contour at non-interior level {}",
            line.level
        );
    }

    // Every region label comes from the 5-band level set.
    let regions = out.regions.as_ref().unwrap();
    assert!(!regions.is_empty());
    for region in regions {
        assert!(region.band_index < 5);
    }
}

#[test]
fn test_regions_partition_the_cover() {
    let geom = Geometry::Points(PointSet::new(random_unit_points(100, 42)));
    let opts = SmoothOptions {
        target_cells: 2_500,
        level_count: 4,
        style: Some(ClassifyStyle::Equal),
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();

    let cover_area = out.cover.polygon.unsigned_area();
    let regions_area: f64 = out
        .regions
        .as_ref()
        .unwrap()
        .iter()
        .map(|r| r.geometry.unsigned_area())
        .sum();
    // The seam strips removed around contour lines are vanishingly thin.
    assert!(
        (regions_area - cover_area).abs() / cover_area < 1e-2,
        "regions cover {} of {}",
        regions_area,
        cover_area
    );
}

// ============================================================================
// Explicit breaks on raw gridded values
// ============================================================================

#[test]
fn test_explicit_breaks_trace_interior_levels_only() {
    let geom = grid_geometry(gradient_values(20, 20, 0.0, 3.0), 20, 20);
    let opts = SmoothOptions {
        smooth: false,
        breaks: Some(vec![0.0, 1.0, 2.0, 3.0]),
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();

    assert_eq!(out.breaks, vec![0.0, 1.0, 2.0, 3.0]);

    // The range bounds 0 and 3 are never traced.
    let mut levels: Vec<f64> = out
        .contours
        .as_ref()
        .unwrap()
        .iter()
        .map(|l| l.level)
        .collect();
    levels.sort_by(|a, b| a.partial_cmp(b).unwrap());
    levels.dedup();
    assert_eq!(levels, vec![1.0, 2.0]);

    // Four breaks mean three bands, all present in the gradient.
    let regions = out.regions.as_ref().unwrap();
    let mut band_indices: Vec<usize> = regions.iter().map(|r| r.band_index).collect();
    band_indices.sort_unstable();
    assert_eq!(band_indices, vec![0, 1, 2]);

    // Band values fall inside their own interval.
    for region in regions {
        assert!(region.value >= region.band.lower && region.value < region.band.upper);
    }
}

// ============================================================================
// Smooth cover on a bimodal pattern
// ============================================================================

#[test]
fn test_smooth_cover_yields_independent_components() {
    let geom = Geometry::Points(PointSet::new(bimodal_points(60, 11)));
    let opts = SmoothOptions {
        target_cells: 10_000,
        bandwidth: Some((0.05, 0.05)),
        cover_strategy: Some(CoverStrategy::Smooth),
        style: Some(ClassifyStyle::Equal),
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();

    assert_eq!(out.cover.resolution.reason, "requested");
    assert_eq!(out.cover.polygon.0.len(), 2, "expected two disjoint components");

    // Each component carries its own nested regions, so the flattened
    // region parts outnumber the components.
    let regions = out.regions.as_ref().unwrap();
    let parts: usize = regions.iter().map(|r| r.geometry.0.len()).sum();
    assert!(parts >= 2);

    // Outside the cover the raster is masked.
    let raster = out.raster.as_ref().unwrap();
    assert!(raster.values.iter().any(|v| v.is_nan()));
}

// ============================================================================
// Explicit cover and bbox handling
// ============================================================================

#[test]
fn test_explicit_cover_never_shrinks_the_grid() {
    let geom = grid_geometry(gradient_values(20, 20, 0.0, 3.0), 20, 20);
    let small_cover = geo::MultiPolygon(vec![rect_polygon(0.2, 0.2, 0.6, 0.6)]);
    let opts = SmoothOptions {
        smooth: false,
        cover: Some(small_cover.clone()),
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();

    // A cover smaller than the data leaves the grid extent alone.
    let raster = out.raster.as_ref().unwrap();
    assert_eq!(raster.grid.bbox, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(out.cover.resolution.reason, "explicit-cover");
    assert_eq!(out.cover.polygon, small_cover);

    // Cells outside the cover are masked out of the raster.
    assert!(raster.values.iter().any(|v| v.is_nan()));
    assert!(out.cover.mask_count() < out.cover.mask.len());
}

#[test]
fn test_explicit_cover_expands_the_grid() {
    let geom = Geometry::Points(PointSet::new(random_unit_points(50, 9)));
    let big_cover = geo::MultiPolygon(vec![rect_polygon(-0.5, -0.5, 1.5, 1.5)]);
    let opts = SmoothOptions {
        target_cells: 2_500,
        cover: Some(big_cover),
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();

    let bbox = out.raster.as_ref().unwrap().grid.bbox;
    assert!(bbox.min_x <= -0.5 && bbox.min_y <= -0.5);
    assert!(bbox.max_x >= 1.5 && bbox.max_y >= 1.5);
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_too_many_contours_aborts_without_partial_output() {
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
    let geom = grid_geometry(values, n, n);
    let opts = SmoothOptions {
        smooth: false,
        breaks: Some(vec![0.0, 0.5, 1.0]),
        ..Default::default()
    };
    match smooth_surface(&geom, &opts) {
        Err(SmoothError::TooManyContours { count, limit }) => assert!(count > limit),
        other => panic!("expected TooManyContours, got {:?}", other),
    }
}

#[test]
fn test_constant_surface_fails_only_when_levels_needed() {
    let geom = grid_geometry(vec![2.0; 100], 10, 10);
    let opts = SmoothOptions {
        smooth: false,
        ..Default::default()
    };
    assert!(matches!(
        smooth_surface(&geom, &opts),
        Err(SmoothError::InvalidBreaks(_))
    ));

    // A raster-only run of the same input succeeds with empty breaks.
    let raster_only = SmoothOptions {
        outputs: vec!["raster".to_string()],
        ..opts
    };
    let out = smooth_surface(&geom, &raster_only).unwrap();
    assert!(out.raster.is_some());
    assert!(out.contours.is_none());
    assert!(out.regions.is_none());
    assert!(out.breaks.is_empty());
}

#[test]
fn test_empty_input_is_rejected() {
    let geom = Geometry::Points(PointSet::new(vec![]));
    let err = smooth_surface(&geom, &SmoothOptions::default()).unwrap_err();
    assert!(matches!(err, SmoothError::InvalidParameter { .. }));
}

// ============================================================================
// Output selection and determinism
// ============================================================================

#[test]
fn test_unknown_output_key_is_omitted_not_fatal() {
    let geom = Geometry::Points(PointSet::new(random_unit_points(60, 3)));
    let opts = SmoothOptions {
        target_cells: 2_500,
        outputs: vec!["contours".to_string(), "hexbin".to_string()],
        ..Default::default()
    };
    let out = smooth_surface(&geom, &opts).unwrap();
    assert!(out.raster.is_none());
    assert!(out.contours.is_some());
    assert!(out.regions.is_none());
}

#[test]
fn test_runs_are_deterministic() {
    let geom = Geometry::Points(PointSet::new(random_unit_points(80, 17)));
    let opts = SmoothOptions {
        target_cells: 2_500,
        level_count: 4,
        style: Some(ClassifyStyle::Equal),
        ..Default::default()
    };
    let a = smooth_surface(&geom, &opts).unwrap();
    let b = smooth_surface(&geom, &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_contour_smoothing_keeps_levels() {
    let geom = Geometry::Points(PointSet::new(random_unit_points(80, 17)));
    let base = SmoothOptions {
        target_cells: 2_500,
        level_count: 4,
        style: Some(ClassifyStyle::Equal),
        ..Default::default()
    };
    let plain = smooth_surface(&geom, &base).unwrap();
    let smoothed = smooth_surface(
        &geom,
        &SmoothOptions {
            contour_smoothing: 2,
            ..base
        },
    )
    .unwrap();

    let plain_lines = plain.contours.as_ref().unwrap();
    let smooth_lines = smoothed.contours.as_ref().unwrap();
    assert_eq!(plain_lines.len(), smooth_lines.len());
    for (p, s) in plain_lines.iter().zip(smooth_lines) {
        assert_eq!(p.level, s.level);
        assert!(s.points.len() >= p.points.len());
    }
}
