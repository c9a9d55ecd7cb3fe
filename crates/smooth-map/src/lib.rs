//! Smoothed thematic maps from points, polygons or gridded values.
//!
//! The crate estimates a density or intensity surface for the input,
//! resolves the cover it is valid within, traces isolines at classified
//! levels and rebuilds the cover as banded dasymetric regions. A small
//! layout compositor turns the artifacts into a device-independent scene
//! tree.
//!
//! The main entry point is [`smooth_surface`]; everything it needs is in
//! [`SmoothOptions`] and everything it produces in [`SmoothOutput`].

pub mod config;
pub mod geojson;
pub mod pipeline;

pub use config::{OutputSelection, ResolvedConfig, SmoothOptions};
pub use geojson::{contours_to_geojson, regions_to_geojson, FeatureCollection};
pub use pipeline::{smooth_surface, SmoothOutput};

// Re-export the collaborating crates' public surfaces so downstream users
// need only one dependency.
pub use isoline::{ClassifyStyle, ContourLine};
pub use map_common::{
    Band, BandSet, BoundingBox, Geometry, GridSpec, SmoothError, SmoothResult, Surface,
};
pub use regions::RegionBand;
pub use surface::{Cover, CoverStrategy};
