//! Level selection and iso-line extraction for gridded surfaces.
//!
//! Implements the two middle stages of the smoothing pipeline:
//! - Break/level selection via classification styles
//! - Contour tracing (marching squares over cell-center axes)

pub mod classify;
pub mod levels;
pub mod marching;
pub mod trace;

pub use classify::{class_breaks, ClassifyStyle};
pub use levels::select_levels;
pub use marching::{
    closed_rings, connect_segments, march_squares, smooth_contour, ContourLine, IsoSegment,
};
pub use trace::{trace_contours, MAX_CONTOUR_LINES};
