//! Contour tracing over a surface at a set of break levels.

use crate::marching::{connect_segments, march_squares, ContourLine};
use map_common::{SmoothError, SmoothResult, Surface};

/// Sanity ceiling on the traced line count: more contour lines than this
/// means a degenerate bandwidth or level configuration, not a usable map.
pub const MAX_CONTOUR_LINES: usize = 10_000;

/// Trace iso-lines for every interior break of `breaks`.
///
/// The first and last break bound the value range and produce no lines; a
/// break sequence `[0, 1, 2, 3]` traces levels `[1, 2]`. When the surface
/// carries raw (unsmoothed) cell values the output is blockier; that is the
/// documented trade-off of skipping the smoother, not a tracing bug.
pub fn trace_contours(surface: &Surface, breaks: &[f64]) -> SmoothResult<Vec<ContourLine>> {
    if breaks.len() < 2 {
        return Err(SmoothError::InvalidBreaks(format!(
            "need at least 2 breaks to trace, got {}",
            breaks.len()
        )));
    }

    let xs = surface.grid.x_centers();
    let ys = surface.grid.y_centers();
    let eps = surface
        .grid
        .cell_width()
        .min(surface.grid.cell_height())
        * 1e-6;

    let interior = if breaks.len() > 2 {
        &breaks[1..breaks.len() - 1]
    } else {
        // With exactly two breaks there is nothing strictly between the
        // range bounds; trace the midpoint so one band boundary exists.
        return trace_levels(
            surface,
            &xs,
            &ys,
            eps,
            &[(breaks[0] + breaks[breaks.len() - 1]) / 2.0],
        );
    };

    trace_levels(surface, &xs, &ys, eps, interior)
}

fn trace_levels(
    surface: &Surface,
    xs: &[f64],
    ys: &[f64],
    eps: f64,
    levels: &[f64],
) -> SmoothResult<Vec<ContourLine>> {
    let mut all = Vec::new();

    for &level in levels {
        let segments = march_squares(xs, ys, &surface.values, level);
        let mut lines = connect_segments(segments, eps);
        for line in &mut lines {
            line.level = level;
        }
        all.extend(lines);

        if all.len() > MAX_CONTOUR_LINES {
            return Err(SmoothError::TooManyContours {
                count: all.len(),
                limit: MAX_CONTOUR_LINES,
            });
        }
    }

    if all.is_empty() {
        return Err(SmoothError::NoContoursFound);
    }

    tracing::debug!(
        n_levels = levels.len(),
        n_lines = all.len(),
        total_points = all.iter().map(|l| l.points.len()).sum::<usize>(),
        "traced contours"
    );
    Ok(all)
}
