//! Iso-line extraction using the marching squares algorithm.
//!
//! The grid is addressed through its cell-center coordinate axes: corner
//! `(row, col)` of a marching square sits at `(xs[col], ys[row])`, with row
//! 0 southernmost. Cells touching a missing (`NaN`) corner produce no
//! segments.

use serde::{Deserialize, Serialize};

/// A line segment between two points, in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoSegment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// A complete contour line (polyline) at a single level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLine {
    pub level: f64,
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

impl ContourLine {
    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let dx = w[1].0 - w[0].0;
                let dy = w[1].1 - w[0].1;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }
}

/// Extract the raw segments of one contour level.
///
/// `values` is row-major with `ys.len()` rows of `xs.len()` columns.
pub fn march_squares(xs: &[f64], ys: &[f64], values: &[f64], level: f64) -> Vec<IsoSegment> {
    let ncols = xs.len();
    let nrows = ys.len();
    if ncols < 2 || nrows < 2 || values.len() != ncols * nrows {
        return vec![];
    }

    let mut segments = Vec::new();

    for row in 0..(nrows - 1) {
        for col in 0..(ncols - 1) {
            // Corners: a = SW, b = SE, c = NE, d = NW.
            let a = values[row * ncols + col];
            let b = values[row * ncols + col + 1];
            let c = values[(row + 1) * ncols + col + 1];
            let d = values[(row + 1) * ncols + col];

            if a.is_nan() || b.is_nan() || c.is_nan() || d.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if a >= level {
                cell_index |= 1;
            }
            if b >= level {
                cell_index |= 2;
            }
            if c >= level {
                cell_index |= 4;
            }
            if d >= level {
                cell_index |= 8;
            }

            segments.extend(cell_segments(
                cell_index,
                (xs[col], ys[row]),
                (xs[col + 1], ys[row]),
                (xs[col + 1], ys[row + 1]),
                (xs[col], ys[row + 1]),
                (a, b, c, d),
                level,
            ));
        }
    }

    segments
}

/// Segments for one marching squares cell, with linearly interpolated edge
/// crossings.
#[allow(clippy::too_many_arguments)]
fn cell_segments(
    cell_index: u8,
    pa: (f64, f64),
    pb: (f64, f64),
    pc: (f64, f64),
    pd: (f64, f64),
    (a, b, c, d): (f64, f64, f64, f64),
    level: f64,
) -> Vec<IsoSegment> {
    let south = interpolate_edge(pa, pb, a, b, level);
    let east = interpolate_edge(pb, pc, b, c, level);
    let north = interpolate_edge(pd, pc, d, c, level);
    let west = interpolate_edge(pa, pd, a, d, level);

    // Lookup table: which edges the contour connects for each corner mask.
    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![IsoSegment {
            start: west,
            end: south,
        }],
        2 | 13 => vec![IsoSegment {
            start: south,
            end: east,
        }],
        3 | 12 => vec![IsoSegment {
            start: west,
            end: east,
        }],
        4 | 11 => vec![IsoSegment {
            start: east,
            end: north,
        }],
        5 => vec![
            // Saddle: two separate segments.
            IsoSegment {
                start: west,
                end: south,
            },
            IsoSegment {
                start: east,
                end: north,
            },
        ],
        6 | 9 => vec![IsoSegment {
            start: south,
            end: north,
        }],
        7 | 8 => vec![IsoSegment {
            start: west,
            end: north,
        }],
        10 => vec![
            IsoSegment {
                start: south,
                end: east,
            },
            IsoSegment {
                start: west,
                end: north,
            },
        ],
        _ => vec![],
    }
}

/// Linearly interpolate the level crossing between two corner points.
fn interpolate_edge(p1: (f64, f64), p2: (f64, f64), v1: f64, v2: f64, level: f64) -> (f64, f64) {
    if (v2 - v1).abs() < 1e-12 {
        return ((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    (p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

/// Connect unordered segments into continuous polylines.
///
/// `eps` is the point-matching tolerance; callers derive it from the grid
/// spacing. Lines are extended forward from an arbitrary seed segment,
/// then once more from the reversed head so a seed in the middle of a line
/// still yields one polyline, and closure is detected at the end.
pub fn connect_segments(segments: Vec<IsoSegment>, eps: f64) -> Vec<ContourLine> {
    if segments.is_empty() {
        return vec![];
    }

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }

        let mut points = vec![segments[start_idx].start, segments[start_idx].end];
        used[start_idx] = true;

        extend_forward(&mut points, &segments, &mut used, eps);
        points.reverse();
        extend_forward(&mut points, &segments, &mut used, eps);

        let first = points[0];
        let last = *points.last().expect("polyline has at least two points");
        let closed = dist(first, last) < eps;
        if closed && points.len() > 2 {
            // Snap the seam shut so downstream polygon building sees an
            // exact ring.
            *points.last_mut().expect("non-empty") = first;
        }

        contours.push(ContourLine {
            level: 0.0, // set by the caller
            points,
            closed,
        });
    }

    contours
}

/// Greedily append segments that continue the tail of `points`.
fn extend_forward(
    points: &mut Vec<(f64, f64)>,
    segments: &[IsoSegment],
    used: &mut [bool],
    eps: f64,
) {
    let mut changed = true;
    while changed {
        changed = false;
        let tail = *points.last().expect("non-empty polyline");
        for (i, seg) in segments.iter().enumerate() {
            if used[i] {
                continue;
            }
            if dist(seg.start, tail) < eps {
                points.push(seg.end);
                used[i] = true;
                changed = true;
                break;
            } else if dist(seg.end, tail) < eps {
                points.push(seg.start);
                used[i] = true;
                changed = true;
                break;
            }
        }
    }
}

fn dist(p: (f64, f64), q: (f64, f64)) -> f64 {
    let dx = p.0 - q.0;
    let dy = p.1 - q.1;
    (dx * dx + dy * dy).sqrt()
}

/// Apply Chaikin's corner cutting algorithm for smoothing.
pub fn smooth_contour(contour: &ContourLine, iterations: u32) -> ContourLine {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let mut next = Vec::with_capacity(points.len() * 2);
        let n = points.len();
        for i in 0..n {
            let p1 = points[i];
            let p2 = if contour.closed {
                points[(i + 1) % n]
            } else if i + 1 < n {
                points[i + 1]
            } else {
                break;
            };
            next.push((0.75 * p1.0 + 0.25 * p2.0, 0.75 * p1.1 + 0.25 * p2.1));
            next.push((0.25 * p1.0 + 0.75 * p2.0, 0.25 * p1.1 + 0.75 * p2.1));
        }
        if !contour.closed && !points.is_empty() {
            next.insert(0, points[0]);
            if let Some(&last) = points.last() {
                next.push(last);
            }
        }
        points = next;
    }

    ContourLine {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Trace guaranteed-closed rings of the region where `values >= level`.
///
/// The field is padded with a one-cell border well below `level`, so every
/// iso-line closes instead of running off the grid edge. Missing cells are
/// treated as below-level. Used for mask-to-polygon derivation (smooth and
/// grid covers), where open lines would be useless.
pub fn closed_rings(xs: &[f64], ys: &[f64], values: &[f64], level: f64) -> Vec<Vec<(f64, f64)>> {
    let ncols = xs.len();
    let nrows = ys.len();
    if ncols < 2 || nrows < 2 || values.len() != ncols * nrows {
        return vec![];
    }

    let min_finite = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::INFINITY, f64::min);
    let pad_value = level.min(min_finite) - 1.0;

    let dx = xs[1] - xs[0];
    let dy = ys[1] - ys[0];
    let mut pxs = Vec::with_capacity(ncols + 2);
    pxs.push(xs[0] - dx);
    pxs.extend_from_slice(xs);
    pxs.push(xs[ncols - 1] + dx);
    let mut pys = Vec::with_capacity(nrows + 2);
    pys.push(ys[0] - dy);
    pys.extend_from_slice(ys);
    pys.push(ys[nrows - 1] + dy);

    let pcols = ncols + 2;
    let prows = nrows + 2;
    let mut padded = vec![pad_value; pcols * prows];
    for row in 0..nrows {
        for col in 0..ncols {
            let v = values[row * ncols + col];
            padded[(row + 1) * pcols + col + 1] = if v.is_nan() { pad_value } else { v };
        }
    }

    let eps = dx.abs().min(dy.abs()) * 1e-6;
    let segments = march_squares(&pxs, &pys, &padded, level);
    connect_segments(segments, eps)
        .into_iter()
        .filter(|c| c.closed)
        .map(|c| c.points)
        .collect()
}
