//! Region building: cover minus contour lines, reassembled into bands.

use crate::buffer::{buffer_lines, buffer_polygon, seam_width, union_all};
use geo::{Area, BooleanOps, BoundingRect, Contains, InteriorPoint, LineString, MultiPolygon, Polygon};
use isoline::ContourLine;
use map_common::{Band, BandSet, BoundingBox, SmoothError, SmoothResult, Surface};
use serde::{Deserialize, Serialize};

/// One merged output feature: every region of the same level band, with a
/// representative aggregate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBand {
    pub band_index: usize,
    pub band: Band,
    /// Mean of the member regions' aggregated raster values.
    pub value: f64,
    pub geometry: MultiPolygon<f64>,
}

/// A solid part with its assigned holes and aggregate, before merging.
struct RegionPart {
    exterior: LineString<f64>,
    holes: Vec<LineString<f64>>,
    area: f64,
}

/// Build the dasymetric regions of a cover cut along contour lines.
///
/// The regions partition the cover up to the seam width: thin buffered
/// strips around each contour line are subtracted so every part lies
/// strictly inside its band. Each part is tagged with the average of the
/// raster cells it covers and bucketed through `breaks`.
pub fn build_regions(
    cover: &MultiPolygon<f64>,
    lines: &[ContourLine],
    raster: &Surface,
    breaks: &[f64],
) -> SmoothResult<Vec<RegionBand>> {
    let cover_bbox: BoundingBox = cover
        .bounding_rect()
        .ok_or(SmoothError::AllHoles)?
        .into();
    let w = seam_width(&cover_bbox);

    // 1-2. Buffer both operands, then subtract the line strips. Open
    // lines end on the outermost cell centers, half a cell short of the
    // grid edge; extend their ends past the first cover boundary crossing
    // so the strips cut the cover all the way through without reaching a
    // disjoint arm further along the ray.
    let line_points: Vec<Vec<(f64, f64)>> = lines
        .iter()
        .map(|l| {
            let mut pts = l.points.clone();
            if !l.closed {
                extend_open_ends(&mut pts, &raster.grid.bbox, cover, w);
            }
            pts
        })
        .collect();
    let strips = buffer_lines(&line_points, w);
    let cut = buffer_polygon(cover, w).difference(&strips);

    // 3. Split into per-ring parts with a solid/hole flag: exterior rings
    // are solids, interior rings are hole candidates.
    let mut solids: Vec<RegionPart> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();
    for poly in &cut {
        solids.push(RegionPart {
            exterior: poly.exterior().clone(),
            holes: Vec::new(),
            area: Polygon::new(poly.exterior().clone(), vec![]).unsigned_area(),
        });
        for interior in poly.interiors() {
            holes.push(interior.clone());
        }
    }

    if solids.is_empty() {
        return Err(SmoothError::AllHoles);
    }

    // 4. Assign every hole to the minimum-area solid that contains it, so
    // holes-in-holes nest onto the closest enclosing ring.
    for hole in holes {
        let probe = Polygon::new(hole.clone(), vec![]);
        let Some(pt) = probe.interior_point() else {
            continue;
        };
        let mut best: Option<(usize, f64)> = None;
        for (i, solid) in solids.iter().enumerate() {
            let shell = Polygon::new(solid.exterior.clone(), vec![]);
            if shell.contains(&pt) && best.map_or(true, |(_, a)| solid.area < a) {
                best = Some((i, solid.area));
            }
        }
        match best {
            // 5. Regroup the hole with its parent.
            Some((i, _)) => solids[i].holes.push(hole),
            None => tracing::warn!("hole with no containing solid, dropped"),
        }
    }

    // 6-7. Aggregate a raster value per region and bucket it into a band.
    let bands = BandSet::from_breaks(breaks);
    let mut tagged: Vec<(usize, f64, Polygon<f64>)> = Vec::new();
    for part in solids {
        let polygon = Polygon::new(part.exterior, part.holes);
        let value = match aggregate_value(&polygon, raster) {
            Some(v) => v,
            None => {
                // Documented edge-case policy: missing aggregates take the
                // lowest break instead of being dropped.
                tracing::debug!("region aggregate missing, defaulting to lowest break");
                bands.lowest_break()
            }
        };
        tagged.push((bands.bucket(value), value, polygon));
    }

    // 8. Merge all regions sharing a band into one multi-part feature.
    let mut merged: Vec<RegionBand> = Vec::new();
    for (band_index, band) in bands.bands.iter().enumerate() {
        let members: Vec<&(usize, f64, Polygon<f64>)> =
            tagged.iter().filter(|(b, _, _)| *b == band_index).collect();
        if members.is_empty() {
            continue;
        }
        let value = members.iter().map(|(_, v, _)| v).sum::<f64>() / members.len() as f64;
        let geometry = union_all(
            members
                .iter()
                .map(|(_, _, p)| MultiPolygon(vec![p.clone()]))
                .collect(),
        );
        merged.push(RegionBand {
            band_index,
            band: band.clone(),
            value,
            geometry,
        });
    }

    tracing::debug!(
        n_lines = lines.len(),
        n_bands = merged.len(),
        seam = w,
        "built regions"
    );
    Ok(merged)
}

/// Average of raster cells whose centers fall inside the region.
///
/// Falls back to the cell nearest the region's interior point when the
/// region is thinner than a cell. Returns `None` when even that cell is
/// missing.
fn aggregate_value(region: &Polygon<f64>, raster: &Surface) -> Option<f64> {
    let grid = raster.grid;
    let rect = region.bounding_rect()?;

    let col_lo = index_floor(rect.min().x, grid.bbox.min_x, grid.cell_width(), grid.ncols);
    let col_hi = index_floor(rect.max().x, grid.bbox.min_x, grid.cell_width(), grid.ncols);
    let row_lo = index_floor(rect.min().y, grid.bbox.min_y, grid.cell_height(), grid.nrows);
    let row_hi = index_floor(rect.max().y, grid.bbox.min_y, grid.cell_height(), grid.nrows);

    let mut sum = 0.0;
    let mut count = 0usize;
    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let v = raster.value_at(row, col);
            if v.is_nan() {
                continue;
            }
            let (x, y) = grid.cell_center(row, col);
            if region.contains(&geo::Point::new(x, y)) {
                sum += v;
                count += 1;
            }
        }
    }
    if count > 0 {
        return Some(sum / count as f64);
    }

    let pt = region.interior_point()?;
    let (row, col) = grid.cell_at(
        pt.x().clamp(grid.bbox.min_x, grid.bbox.max_x),
        pt.y().clamp(grid.bbox.min_y, grid.bbox.max_y),
    )?;
    let v = raster.value_at(row, col);
    (!v.is_nan()).then_some(v)
}

/// Push both ends of an open polyline out of the cover, following the
/// direction of the terminal segments. Ends already on or outside the
/// boundary stay put.
fn extend_open_ends(
    points: &mut [(f64, f64)],
    bbox: &BoundingBox,
    cover: &MultiPolygon<f64>,
    w: f64,
) {
    let n = points.len();
    if n < 2 {
        return;
    }
    if let Some(p) = ray_cover_exit(points[1], points[0], bbox, cover, w) {
        points[0] = p;
    }
    if let Some(p) = ray_cover_exit(points[n - 2], points[n - 1], bbox, cover, w) {
        points[n - 1] = p;
    }
}

/// Where the ray from `from` through `end` first leaves the cover, if it
/// travels a positive distance past `end` to get there.
///
/// Stopping at the first cover boundary crossing keeps the extension from
/// slicing a disjoint arm of a non-convex cover further along the ray. The
/// crossing is overrun by a few seam widths so the buffered strip cuts
/// through the boundary; when the ray never crosses a cover edge, the exit
/// from the grid bbox is used instead.
fn ray_cover_exit(
    from: (f64, f64),
    end: (f64, f64),
    bbox: &BoundingBox,
    cover: &MultiPolygon<f64>,
    w: f64,
) -> Option<(f64, f64)> {
    let far = ray_box_exit(from, end, bbox)?;
    let dx = far.0 - end.0;
    let dy = far.1 - end.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return Some(far);
    }

    let mut first: Option<f64> = None;
    for poly in cover {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            for seg in ring.lines() {
                let a = (seg.start.x, seg.start.y);
                let b = (seg.end.x, seg.end.y);
                if let Some(t) = segment_crossing(end, far, a, b) {
                    if t > 1e-12 && first.map_or(true, |f| t < f) {
                        first = Some(t);
                    }
                }
            }
        }
    }

    match first {
        Some(t) => {
            let t = t + w * 4.0 / len;
            Some((end.0 + t * dx, end.1 + t * dy))
        }
        None => Some(far),
    }
}

/// Parameter along `p -> q` of its crossing with the segment `a -> b`, or
/// `None` when the segments miss or are parallel.
fn segment_crossing(
    p: (f64, f64),
    q: (f64, f64),
    a: (f64, f64),
    b: (f64, f64),
) -> Option<f64> {
    let r = (q.0 - p.0, q.1 - p.1);
    let s = (b.0 - a.0, b.1 - a.1);
    let denom = r.0 * s.1 - r.1 * s.0;
    if denom == 0.0 {
        return None;
    }
    let ap = (a.0 - p.0, a.1 - p.1);
    let t = (ap.0 * s.1 - ap.1 * s.0) / denom;
    let u = (ap.0 * r.1 - ap.1 * r.0) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Where the ray from `from` through `end` leaves `bbox`, if it travels a
/// positive distance past `end` to get there.
fn ray_box_exit(from: (f64, f64), end: (f64, f64), bbox: &BoundingBox) -> Option<(f64, f64)> {
    let dx = end.0 - from.0;
    let dy = end.1 - from.1;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let mut t = f64::INFINITY;
    if dx > 0.0 {
        t = t.min((bbox.max_x - end.0) / dx);
    } else if dx < 0.0 {
        t = t.min((bbox.min_x - end.0) / dx);
    }
    if dy > 0.0 {
        t = t.min((bbox.max_y - end.1) / dy);
    } else if dy < 0.0 {
        t = t.min((bbox.min_y - end.1) / dy);
    }
    if !t.is_finite() || t <= 0.0 {
        return None;
    }
    Some((end.0 + t * dx, end.1 + t * dy))
}

/// Clamped cell index along one axis.
fn index_floor(coord: f64, origin: f64, step: f64, n: usize) -> usize {
    let idx = ((coord - origin) / step).floor();
    if idx < 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}
