//! Layout composition for rendered thematic maps.
//!
//! Arranges a pre-rendered map body, legend items and frame/meta
//! decorations into a scene tree whose nodes carry normalized [0,1]
//! viewport rectangles, reasoning about the aspect ratio between the
//! device and the mapped shape so the map body is never distorted.

pub mod compose;
pub mod scene;

pub use compose::{compose, ComposedScene, FrameStyle, LayoutOptions, LegendPosition, MetaElements};
pub use scene::{LegendItem, NodeKind, SceneNode, UnitRect};
