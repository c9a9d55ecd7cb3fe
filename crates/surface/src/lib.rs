//! Surface estimation for the smooth-map pipeline.
//!
//! Implements the first two pipeline stages:
//! - Density estimation: binning/rasterizing input data and smoothing it
//!   with a separable Gaussian kernel
//! - Cover resolution: deriving the spatial extent within which contours
//!   are meaningful

pub mod cover;
pub mod estimate;
pub mod kernel;

pub use cover::{resolve_cover, Cover, CoverResolution, CoverStrategy};
pub use estimate::{estimate, Estimate, EstimatorOptions};
pub use kernel::{gaussian_smooth, Bandwidth};
