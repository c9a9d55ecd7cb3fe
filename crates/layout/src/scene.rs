//! Scene-tree node types.

use serde::{Deserialize, Serialize};

/// A rectangle in normalized [0,1] coordinates of the parent viewport,
/// origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl UnitRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full parent viewport.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Shrink by per-side insets (left, bottom, right, top). Collapses to
    /// a zero-size rectangle at the center rather than inverting.
    pub fn inset(&self, left: f64, bottom: f64, right: f64, top: f64) -> UnitRect {
        let width = (self.width - left - right).max(0.0);
        let height = (self.height - bottom - top).max(0.0);
        UnitRect {
            x: self.x + left.min(self.width / 2.0),
            y: self.y + bottom.min(self.height / 2.0),
            width,
            height,
        }
    }

    /// Largest sub-rectangle with the given absolute aspect ratio,
    /// centered. `self_abs_aspect` is this rectangle's own absolute
    /// (device) aspect; normalized units are not square, so the caller
    /// supplies the conversion.
    pub fn fit_aspect(&self, self_abs_aspect: f64, target_abs_aspect: f64) -> UnitRect {
        if target_abs_aspect >= self_abs_aspect {
            // Wider than the viewport: full width, reduced height.
            let height = self.height * self_abs_aspect / target_abs_aspect;
            UnitRect {
                x: self.x,
                y: self.y + (self.height - height) / 2.0,
                width: self.width,
                height,
            }
        } else {
            let width = self.width * target_abs_aspect / self_abs_aspect;
            UnitRect {
                x: self.x + (self.width - width) / 2.0,
                y: self.y,
                width,
                height: self.height,
            }
        }
    }
}

/// One entry of the legend: a band label and its representative value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub value: f64,
}

/// What a scene node renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Background,
    Frame { double: bool, line_width: f64 },
    MapBody,
    Legend { items: Vec<LegendItem> },
    Title { text: String },
    Credits { text: String },
    Logo,
    ScaleBar,
    Compass,
    /// Debug overlay showing the data-aspect region.
    DebugAspect,
}

/// A node of the composition tree. Children are positioned in their
/// parent's normalized coordinates. The tree is rebuilt on every render;
/// nothing here persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub rect: UnitRect,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(kind: NodeKind, rect: UnitRect) -> Self {
        Self {
            kind,
            rect,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first search for the first node of a kind.
    pub fn find(&self, pred: &dyn Fn(&NodeKind) -> bool) -> Option<&SceneNode> {
        if pred(&self.kind) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }
}
