//! Error types for the smooth-map pipeline.

use thiserror::Error;

/// Result type alias using SmoothError.
pub type SmoothResult<T> = Result<T, SmoothError>;

/// Primary error type for the smoothing/contouring pipeline.
///
/// Every variant is deterministic for a given input: these report bad
/// parameters or degenerate geometry, never transient faults, so callers
/// should not retry.
#[derive(Debug, Error)]
pub enum SmoothError {
    /// The input is none of point set / polygon set / grid.
    ///
    /// Unreachable through the typed [`Geometry`](crate::Geometry) enum;
    /// raised where untyped input first enters (file ingestion).
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Fewer than 2 breaks, or a non-monotonic explicit break sequence.
    #[error("invalid breaks: {0}")]
    InvalidBreaks(String),

    /// Contour tracing produced no lines at any level.
    #[error("no contour lines found; check bandwidth and level choices")]
    NoContoursFound,

    /// Contour tracing exceeded the sanity ceiling, which points at a
    /// degenerate bandwidth or level configuration.
    #[error("contour tracing produced {count} lines (limit {limit})")]
    TooManyContours { count: usize, limit: usize },

    /// Every part left after subtracting contour lines from the cover was
    /// classified as a hole, so the cover topology has no solid base.
    #[error("all region parts are holes; cover topology is degenerate")]
    AllHoles,

    /// An option failed validation at call entry.
    #[error("invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}
