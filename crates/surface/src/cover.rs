//! Cover resolution: the spatial extent within which contours are valid.
//!
//! The cover is kept in two mutually consistent forms: a polygon (for the
//! region builder's boolean geometry) and a boolean raster mask aligned to
//! the surface grid (for masking cell values).

use geo::{Area, Contains, ConvexHull, InteriorPoint, LineString, MultiPolygon, Polygon};
use isoline::closed_rings;
use map_common::{Geometry, GridSpec, SmoothError, SmoothResult, Surface};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Strategy used to derive the cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverStrategy {
    /// Bounding rectangle of the input shape.
    Rect,
    /// The input's own boundary: convex hull for points, union for
    /// polygons, the non-missing cells for grids.
    Original,
    /// Iso-ring of the smoothed density at a fraction of its maximum.
    Smooth,
}

impl FromStr for CoverStrategy {
    type Err = SmoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rect" => Ok(CoverStrategy::Rect),
            "original" => Ok(CoverStrategy::Original),
            "smooth" => Ok(CoverStrategy::Smooth),
            other => Err(SmoothError::InvalidParameter {
                param: "cover_strategy".to_string(),
                message: format!("unknown cover strategy '{}'", other),
            }),
        }
    }
}

/// How the cover strategy was decided, kept for observability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverResolution {
    pub strategy: CoverStrategy,
    /// Why this strategy applies: "requested", "explicit-cover",
    /// "default-points", "default-polygons" or "default-grid".
    pub reason: &'static str,
}

/// The resolved cover: polygon and grid-aligned raster mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Cover {
    pub polygon: MultiPolygon<f64>,
    pub mask: Vec<bool>,
    pub resolution: CoverResolution,
}

impl Cover {
    /// Number of cells inside the cover.
    pub fn mask_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Resolve the cover for an estimated surface.
///
/// An explicit cover polygon overrides any strategy. Otherwise the
/// requested strategy applies, defaulting to `original` for polygon input
/// and `rect` for points and grids. `threshold` is the fraction of the
/// surface maximum used by the `smooth` strategy.
pub fn resolve_cover(
    geometry: &Geometry,
    surface: &Surface,
    requested: Option<CoverStrategy>,
    explicit: Option<&MultiPolygon<f64>>,
    threshold: f64,
) -> SmoothResult<Cover> {
    if let Some(polygon) = explicit {
        let mask = rasterize_mask(&surface.grid, polygon);
        let resolution = CoverResolution {
            strategy: CoverStrategy::Original,
            reason: "explicit-cover",
        };
        tracing::debug!(reason = resolution.reason, cells = mask.len(), "resolved cover");
        return Ok(Cover {
            polygon: polygon.clone(),
            mask,
            resolution,
        });
    }

    let resolution = match requested {
        Some(strategy) => CoverResolution {
            strategy,
            reason: "requested",
        },
        None => match geometry {
            Geometry::Points(_) => CoverResolution {
                strategy: CoverStrategy::Rect,
                reason: "default-points",
            },
            Geometry::Polygons(_) => CoverResolution {
                strategy: CoverStrategy::Original,
                reason: "default-polygons",
            },
            Geometry::Grid(_) => CoverResolution {
                strategy: CoverStrategy::Rect,
                reason: "default-grid",
            },
        },
    };

    let cover = match resolution.strategy {
        CoverStrategy::Rect => rect_cover(&surface.grid, resolution),
        CoverStrategy::Original => original_cover(geometry, surface, resolution)?,
        CoverStrategy::Smooth => smooth_cover(surface, threshold, resolution)?,
    };

    tracing::debug!(
        strategy = ?cover.resolution.strategy,
        reason = cover.resolution.reason,
        parts = cover.polygon.0.len(),
        cells_inside = cover.mask_count(),
        "resolved cover"
    );
    Ok(cover)
}

fn rect_cover(grid: &GridSpec, resolution: CoverResolution) -> Cover {
    let b = grid.bbox;
    let polygon = MultiPolygon(vec![Polygon::new(
        LineString::from(vec![
            (b.min_x, b.min_y),
            (b.max_x, b.min_y),
            (b.max_x, b.max_y),
            (b.min_x, b.max_y),
            (b.min_x, b.min_y),
        ]),
        vec![],
    )]);
    Cover {
        polygon,
        mask: vec![true; grid.len()],
        resolution,
    }
}

fn original_cover(
    geometry: &Geometry,
    surface: &Surface,
    resolution: CoverResolution,
) -> SmoothResult<Cover> {
    let polygon = match geometry {
        Geometry::Points(_) => {
            let multi: geo::MultiPoint<f64> = geometry
                .representative_points()
                .into_iter()
                .map(|(x, y)| geo::Point::new(x, y))
                .collect();
            MultiPolygon(vec![multi.convex_hull()])
        }
        Geometry::Polygons(p) => {
            use geo::BooleanOps;
            let mut acc = MultiPolygon::<f64>(vec![]);
            for poly in &p.polygons {
                acc = acc.union(&MultiPolygon(vec![poly.clone()]));
            }
            acc
        }
        Geometry::Grid(_) => {
            // The raw cells as-is: ring the non-missing area.
            let indicator: Vec<f64> = surface
                .values
                .iter()
                .map(|v| if v.is_nan() { 0.0 } else { 1.0 })
                .collect();
            let rings = closed_rings(
                &surface.grid.x_centers(),
                &surface.grid.y_centers(),
                &indicator,
                0.5,
            );
            rings_to_polygons(rings)
        }
    };

    let mask = match geometry {
        Geometry::Grid(_) => surface.values.iter().map(|v| !v.is_nan()).collect(),
        _ => rasterize_mask(&surface.grid, &polygon),
    };

    Ok(Cover {
        polygon,
        mask,
        resolution,
    })
}

fn smooth_cover(
    surface: &Surface,
    threshold: f64,
    resolution: CoverResolution,
) -> SmoothResult<Cover> {
    let (_, max) = surface
        .value_range()
        .ok_or_else(|| SmoothError::InvalidParameter {
            param: "cover_threshold".to_string(),
            message: "surface has no values to threshold".to_string(),
        })?;
    let level = threshold * max;

    let mask: Vec<bool> = surface
        .values
        .iter()
        .map(|&v| !v.is_nan() && v >= level)
        .collect();

    let rings = closed_rings(
        &surface.grid.x_centers(),
        &surface.grid.y_centers(),
        &surface.values,
        level,
    );
    let polygon = rings_to_polygons(rings);

    Ok(Cover {
        polygon,
        mask,
        resolution,
    })
}

/// Grid-aligned boolean mask of cells whose centers fall inside `polygon`.
pub fn rasterize_mask(grid: &GridSpec, polygon: &MultiPolygon<f64>) -> Vec<bool> {
    let mut mask = vec![false; grid.len()];
    for row in 0..grid.nrows {
        for col in 0..grid.ncols {
            let (x, y) = grid.cell_center(row, col);
            if polygon.contains(&geo::Point::new(x, y)) {
                mask[grid.flat_index(row, col)] = true;
            }
        }
    }
    mask
}

/// Assemble closed rings into polygons, nesting holes by containment depth.
///
/// A ring contained in an even number of other rings is an exterior; odd
/// means a hole, assigned to its smallest containing exterior.
fn rings_to_polygons(rings: Vec<Vec<(f64, f64)>>) -> MultiPolygon<f64> {
    let ring_polys: Vec<Polygon<f64>> = rings
        .into_iter()
        .filter(|r| r.len() >= 4)
        .map(|r| Polygon::new(LineString::from(r), vec![]))
        .collect();

    let interior_pts: Vec<Option<geo::Point<f64>>> =
        ring_polys.iter().map(|p| p.interior_point()).collect();

    let mut depth = vec![0usize; ring_polys.len()];
    for (i, pt) in interior_pts.iter().enumerate() {
        let Some(pt) = pt else { continue };
        for (j, other) in ring_polys.iter().enumerate() {
            if i != j && other.contains(pt) {
                depth[i] += 1;
            }
        }
    }

    let mut exteriors: Vec<(usize, LineString<f64>, Vec<LineString<f64>>)> = ring_polys
        .iter()
        .enumerate()
        .filter(|(i, _)| depth[*i] % 2 == 0)
        .map(|(i, p)| (i, p.exterior().clone(), Vec::new()))
        .collect();

    for (i, ring) in ring_polys.iter().enumerate() {
        if depth[i] % 2 == 0 {
            continue;
        }
        let Some(pt) = interior_pts[i] else { continue };
        // Smallest exterior containing the hole.
        let mut best: Option<(usize, f64)> = None;
        for (slot, &(j, _, _)) in exteriors.iter().enumerate() {
            let candidate = &ring_polys[j];
            if candidate.contains(&pt) {
                let area = candidate.unsigned_area();
                if best.map_or(true, |(_, a)| area < a) {
                    best = Some((slot, area));
                }
            }
        }
        if let Some((slot, _)) = best {
            exteriors[slot].2.push(ring.exterior().clone());
        }
    }

    MultiPolygon(
        exteriors
            .into_iter()
            .map(|(_, ext, holes)| Polygon::new(ext, holes))
            .collect(),
    )
}
