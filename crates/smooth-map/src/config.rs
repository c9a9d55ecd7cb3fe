//! User-facing options and their resolution into an explicit pipeline
//! configuration.
//!
//! [`SmoothOptions`] is the loose surface the caller fills in; every field
//! has a sensible default. [`ResolvedConfig`] is the fully determined form
//! the pipeline actually runs on: all precedence rules (explicit breaks
//! force the fixed style, output keys are parsed and deduplicated) are
//! applied exactly once, here.

use geo::MultiPolygon;
use isoline::ClassifyStyle;
use map_common::{SmoothError, SmoothResult};
use surface::{CoverStrategy, EstimatorOptions};

/// Which artifacts the pipeline should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputSelection {
    pub raster: bool,
    pub contours: bool,
    pub regions: bool,
}

impl OutputSelection {
    /// All artifacts.
    pub fn all() -> Self {
        Self {
            raster: true,
            contours: true,
            regions: true,
        }
    }

    /// Parse output keys. Unknown keys are reported via `tracing::warn!`
    /// and skipped; they never fail the run.
    pub fn from_keys(keys: &[String]) -> Self {
        let mut sel = Self::default();
        for key in keys {
            match key.to_ascii_lowercase().as_str() {
                "raster" => sel.raster = true,
                "contour" | "contours" => sel.contours = true,
                "region" | "regions" => sel.regions = true,
                other => {
                    tracing::warn!(key = other, "unknown output format, skipping");
                }
            }
        }
        sel
    }

    pub fn is_empty(&self) -> bool {
        !(self.raster || self.contours || self.regions)
    }
}

/// Options for [`crate::smooth_surface`].
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Display name of the mapped variable, used in labels.
    pub variable: Option<String>,
    /// Explicit grid rows; derived from `target_cells` when `None`.
    pub nrows: Option<usize>,
    /// Explicit grid columns; derived from `target_cells` when `None`.
    pub ncols: Option<usize>,
    /// Target total cell count when dimensions are not given.
    pub target_cells: usize,
    /// Kernel bandwidth per axis in coordinate units; default 3 cells.
    pub bandwidth: Option<(f64, f64)>,
    /// Smooth areal/grid input before contouring. Point input is always
    /// smoothed regardless.
    pub smooth: bool,
    /// Uniform weight multiplier for point input.
    pub point_weight: f64,
    /// Number of classes when breaks are derived from the data.
    pub level_count: usize,
    /// Classification style; default pretty. Ignored (forced to fixed)
    /// when `breaks` is set.
    pub style: Option<ClassifyStyle>,
    /// Explicit break sequence, strictly increasing.
    pub breaks: Option<Vec<f64>>,
    /// Cover strategy; defaults depend on the input kind.
    pub cover_strategy: Option<CoverStrategy>,
    /// Explicit cover polygon, overriding any strategy.
    pub cover: Option<MultiPolygon<f64>>,
    /// Fraction of the surface maximum used by the smooth cover strategy.
    pub cover_threshold: f64,
    /// Chaikin smoothing passes applied to traced contour lines.
    pub contour_smoothing: u32,
    /// Output keys: "raster", "contours", "regions". Empty means all.
    pub outputs: Vec<String>,
    /// Return the unmasked surface instead of the cover-masked one.
    pub raster_as_native_grid: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            variable: None,
            nrows: None,
            ncols: None,
            target_cells: 250_000,
            bandwidth: None,
            smooth: true,
            point_weight: 1.0,
            level_count: 5,
            style: None,
            breaks: None,
            cover_strategy: None,
            cover: None,
            cover_threshold: 0.6,
            contour_smoothing: 0,
            outputs: Vec::new(),
            raster_as_native_grid: false,
        }
    }
}

/// The fully resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub estimator: EstimatorOptions,
    pub style: ClassifyStyle,
    pub level_count: usize,
    pub breaks: Option<Vec<f64>>,
    pub cover_strategy: Option<CoverStrategy>,
    pub cover: Option<MultiPolygon<f64>>,
    pub cover_threshold: f64,
    pub contour_smoothing: u32,
    pub outputs: OutputSelection,
    pub raster_as_native_grid: bool,
}

impl ResolvedConfig {
    /// Resolve and validate `opts`.
    pub fn resolve(opts: &SmoothOptions) -> SmoothResult<ResolvedConfig> {
        if opts.point_weight <= 0.0 || !opts.point_weight.is_finite() {
            return Err(SmoothError::InvalidParameter {
                param: "point_weight".to_string(),
                message: format!("must be a positive finite number, got {}", opts.point_weight),
            });
        }
        if opts.level_count == 0 {
            return Err(SmoothError::InvalidParameter {
                param: "level_count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(opts.cover_threshold > 0.0 && opts.cover_threshold < 1.0) {
            return Err(SmoothError::InvalidParameter {
                param: "cover_threshold".to_string(),
                message: format!("must lie in (0, 1), got {}", opts.cover_threshold),
            });
        }
        if let Some((bx, by)) = opts.bandwidth {
            if bx <= 0.0 || by <= 0.0 {
                return Err(SmoothError::InvalidParameter {
                    param: "bandwidth".to_string(),
                    message: format!("must be positive per axis, got ({}, {})", bx, by),
                });
            }
        }

        // Explicit breaks take precedence over any requested style.
        let style = if opts.breaks.is_some() {
            if opts.style.is_some() && opts.style != Some(ClassifyStyle::Fixed) {
                tracing::debug!("explicit breaks supplied, classification style forced to fixed");
            }
            ClassifyStyle::Fixed
        } else {
            opts.style.unwrap_or(ClassifyStyle::Pretty)
        };

        let outputs = if opts.outputs.is_empty() {
            OutputSelection::all()
        } else {
            OutputSelection::from_keys(&opts.outputs)
        };

        let estimator = EstimatorOptions {
            nrows: opts.nrows,
            ncols: opts.ncols,
            target_cells: opts.target_cells,
            bandwidth: opts.bandwidth,
            smooth: opts.smooth,
            point_weight: opts.point_weight,
            expand_bbox: opts
                .cover
                .as_ref()
                .and_then(|c| geo::BoundingRect::bounding_rect(c))
                .map(Into::into),
        };

        Ok(ResolvedConfig {
            estimator,
            style,
            level_count: opts.level_count,
            breaks: opts.breaks.clone(),
            cover_strategy: opts.cover_strategy,
            cover: opts.cover.clone(),
            cover_threshold: opts.cover_threshold,
            contour_smoothing: opts.contour_smoothing,
            outputs,
            raster_as_native_grid: opts.raster_as_native_grid,
        })
    }
}
