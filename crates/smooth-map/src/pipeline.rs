//! The end-to-end smoothing pipeline.
//!
//! Wiring order is fixed: estimate a surface, resolve the cover, mask the
//! surface to the cover, select levels, trace contour lines and build the
//! banded regions. Every stage lives in its own crate; this module only
//! orchestrates and decides which artifacts to keep.

use isoline::{select_levels, smooth_contour, trace_contours, ContourLine};
use map_common::{Geometry, SmoothResult, Surface};
use regions::{build_regions, RegionBand};
use surface::{estimate, resolve_cover, Cover};
use tracing::{debug, info};

use crate::config::{ResolvedConfig, SmoothOptions};

/// The artifacts of one pipeline run. Unrequested artifacts are `None`;
/// the bundle shape itself never varies with the output selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothOutput {
    /// The estimated surface, masked to the cover unless the native grid
    /// was requested.
    pub raster: Option<Surface>,
    /// Traced contour lines at the interior break levels.
    pub contours: Option<Vec<ContourLine>>,
    /// Merged per-band regions partitioning the cover.
    pub regions: Option<Vec<RegionBand>>,
    /// The break sequence the contours and regions were derived from.
    pub breaks: Vec<f64>,
    /// How the cover strategy was decided.
    pub cover: Cover,
}

/// Run the full pipeline on `geometry`.
///
/// The run is deterministic: the same input and options always produce the
/// same output. Any stage error aborts the run; there is no partial
/// output.
pub fn smooth_surface(geometry: &Geometry, opts: &SmoothOptions) -> SmoothResult<SmoothOutput> {
    let cfg = ResolvedConfig::resolve(opts)?;

    let est = estimate(geometry, &cfg.estimator)?;
    debug!(
        nrows = est.surface.grid.nrows,
        ncols = est.surface.grid.ncols,
        mass = est.mass,
        "estimated surface"
    );

    let cover = resolve_cover(
        geometry,
        &est.surface,
        cfg.cover_strategy,
        cfg.cover.as_ref(),
        cfg.cover_threshold,
    )?;
    let masked = est.surface.masked(&cover.mask);

    // Level selection is fatal only when something downstream consumes
    // the levels; a raster-only run on a constant surface still succeeds.
    let need_lines = cfg.outputs.contours || cfg.outputs.regions;
    let breaks = match select_levels(&masked, cfg.level_count, cfg.style, cfg.breaks.as_deref()) {
        Ok(breaks) => breaks,
        Err(err) if !need_lines => {
            debug!(%err, "level selection failed, not needed for requested artifacts");
            Vec::new()
        }
        Err(err) => return Err(err),
    };

    // Contours are needed for the regions artifact too.
    let lines = if need_lines {
        let mut lines = trace_contours(&masked, &breaks)?;
        if cfg.contour_smoothing > 0 {
            lines = lines
                .iter()
                .map(|l| smooth_contour(l, cfg.contour_smoothing))
                .collect();
        }
        Some(lines)
    } else {
        None
    };

    let region_bands = match (&lines, cfg.outputs.regions) {
        (Some(lines), true) => Some(build_regions(&cover.polygon, lines, &masked, &breaks)?),
        _ => None,
    };

    info!(
        cover_reason = cover.resolution.reason,
        n_breaks = breaks.len(),
        n_contours = lines.as_ref().map_or(0, |l| l.len()),
        n_regions = region_bands.as_ref().map_or(0, |r| r.len()),
        "pipeline complete"
    );

    Ok(SmoothOutput {
        raster: cfg.outputs.raster.then(|| {
            if cfg.raster_as_native_grid {
                est.surface.clone()
            } else {
                masked.clone()
            }
        }),
        contours: if cfg.outputs.contours { lines.clone() } else { None },
        regions: region_bands,
        breaks,
        cover,
    })
}
