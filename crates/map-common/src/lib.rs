//! Common types shared across the smooth-map workspace.

pub mod band;
pub mod bbox;
pub mod error;
pub mod geometry;
pub mod grid;

pub use band::{format_value, Band, BandSet};
pub use bbox::BoundingBox;
pub use error::{SmoothError, SmoothResult};
pub use geometry::{Geometry, GridData, PointSet, PolygonSet};
pub use grid::{GridSpec, Surface};
