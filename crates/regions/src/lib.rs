//! Dasymetric region construction.
//!
//! Converts a cover polygon plus traced contour lines into closed regions,
//! one value band each: the cover is cut along thin buffered strips around
//! every contour line, the resulting parts are reassembled with their
//! holes, tagged with an aggregated raster value, bucketed into level
//! bands and merged per band.

pub mod buffer;
pub mod builder;

pub use buffer::{buffer_lines, buffer_polygon, seam_width};
pub use builder::{build_regions, RegionBand};
