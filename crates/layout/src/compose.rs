//! Scene composition: margins, frame, map viewport and meta elements.

use crate::scene::{LegendItem, NodeKind, SceneNode, UnitRect};
use serde::{Deserialize, Serialize};

/// Frame drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    None,
    #[default]
    Single,
    /// Two parallel frame lines with a gap of one line width.
    Double,
}

/// Corner the legend is anchored to, inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    RightBottom,
    RightTop,
    LeftBottom,
    LeftTop,
}

/// Optional meta decorations around the map body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaElements {
    pub title: Option<String>,
    pub credits: Option<String>,
    pub logo: bool,
    pub scale_bar: bool,
    pub compass: bool,
}

/// Layout options for one composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Device viewport aspect ratio (width / height).
    pub device_aspect: f64,
    /// Inner margins (left, bottom, right, top) in normalized units.
    pub inner_margins: [f64; 4],
    pub frame: FrameStyle,
    /// Frame line width in normalized units of the shorter device side.
    pub frame_line_width: f64,
    pub background: bool,
    pub legend_position: LegendPosition,
    /// Compose only meta elements, without a map body.
    pub legend_only: bool,
    /// Overlay a rectangle pair showing the data-aspect region.
    pub debug_aspect: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            device_aspect: 4.0 / 3.0,
            inner_margins: [0.02, 0.02, 0.02, 0.02],
            frame: FrameStyle::Single,
            frame_line_width: 0.004,
            background: false,
            legend_position: LegendPosition::default(),
            legend_only: false,
            debug_aspect: false,
        }
    }
}

/// The composed scene: the root node plus the map body origin within its
/// frame, which the meta-layout step uses to align elements to the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedScene {
    pub root: SceneNode,
    /// X and Y of the map body's lower-left corner in root units; zero in
    /// legend-only mode.
    pub map_offset: (f64, f64),
}

/// Legend panel share of the content width.
const LEGEND_WIDTH: f64 = 0.22;
/// Height of title and bottom meta strips.
const META_STRIP: f64 = 0.06;

/// Compose the scene tree for one render.
///
/// `shape_aspect` is the data bounding box aspect; `None` together with
/// `opts.legend_only` renders only meta elements. The function is pure:
/// it builds and returns the tree, nothing else.
pub fn compose(
    legend_items: Vec<LegendItem>,
    meta: &MetaElements,
    shape_aspect: Option<f64>,
    opts: &LayoutOptions,
) -> ComposedScene {
    let mut children = Vec::new();

    if opts.background {
        children.push(SceneNode::new(NodeKind::Background, UnitRect::full()));
    }

    let [ml, mb, mr, mt] = opts.inner_margins;
    let framed = UnitRect::full().inset(ml, mb, mr, mt);

    // Frame inset: one line width for a single frame, three for a double
    // frame (outer line, gap, inner line).
    let frame_inset = match opts.frame {
        FrameStyle::None => 0.0,
        FrameStyle::Single => opts.frame_line_width,
        FrameStyle::Double => 3.0 * opts.frame_line_width,
    };
    if opts.frame != FrameStyle::None {
        children.push(SceneNode::new(
            NodeKind::Frame {
                double: opts.frame == FrameStyle::Double,
                line_width: opts.frame_line_width,
            },
            framed,
        ));
    }
    let content = framed.inset(frame_inset, frame_inset, frame_inset, frame_inset);
    let content_abs_aspect = opts.device_aspect * content.width / content.height.max(1e-12);

    let (map_rect, map_offset) = match (shape_aspect, opts.legend_only) {
        (Some(aspect), false) => {
            let rect = content.fit_aspect(content_abs_aspect, aspect);
            (Some(rect), (rect.x, rect.y))
        }
        _ => (None, (0.0, 0.0)),
    };

    if opts.debug_aspect {
        children.push(SceneNode::new(NodeKind::DebugAspect, content));
        if let Some(rect) = map_rect {
            children.push(SceneNode::new(NodeKind::DebugAspect, rect));
        }
    }

    if let Some(rect) = map_rect {
        children.push(SceneNode::new(NodeKind::MapBody, rect));
    }

    // Meta elements sit inside the content rect, offset by the map origin
    // where a map body exists, so they never cross the frame border.
    let meta_area = match map_rect {
        Some(rect) => rect,
        None => content,
    };

    if !legend_items.is_empty() {
        let lw = meta_area.width * LEGEND_WIDTH;
        let lh = meta_area.height * 0.4;
        let (lx, ly) = match opts.legend_position {
            LegendPosition::RightBottom => (meta_area.x + meta_area.width - lw, meta_area.y),
            LegendPosition::RightTop => (
                meta_area.x + meta_area.width - lw,
                meta_area.y + meta_area.height - lh,
            ),
            LegendPosition::LeftBottom => (meta_area.x, meta_area.y),
            LegendPosition::LeftTop => (meta_area.x, meta_area.y + meta_area.height - lh),
        };
        children.push(SceneNode::new(
            NodeKind::Legend {
                items: legend_items,
            },
            UnitRect::new(lx, ly, lw, lh),
        ));
    }

    if let Some(text) = &meta.title {
        children.push(SceneNode::new(
            NodeKind::Title { text: text.clone() },
            UnitRect::new(
                content.x,
                content.y + content.height - META_STRIP,
                content.width,
                META_STRIP,
            ),
        ));
    }
    if let Some(text) = &meta.credits {
        children.push(SceneNode::new(
            NodeKind::Credits { text: text.clone() },
            UnitRect::new(
                content.x + content.width * 0.5,
                content.y,
                content.width * 0.5,
                META_STRIP,
            ),
        ));
    }
    if meta.logo {
        children.push(SceneNode::new(
            NodeKind::Logo,
            UnitRect::new(content.x, content.y, META_STRIP, META_STRIP),
        ));
    }
    if meta.scale_bar {
        children.push(SceneNode::new(
            NodeKind::ScaleBar,
            UnitRect::new(
                meta_area.x + meta_area.width * 0.25,
                meta_area.y,
                meta_area.width * 0.25,
                META_STRIP / 2.0,
            ),
        ));
    }
    if meta.compass {
        children.push(SceneNode::new(
            NodeKind::Compass,
            UnitRect::new(
                meta_area.x + meta_area.width - META_STRIP,
                meta_area.y + meta_area.height - META_STRIP,
                META_STRIP,
                META_STRIP,
            ),
        ));
    }

    tracing::debug!(
        n_children = children.len(),
        legend_only = opts.legend_only,
        map_offset_x = map_offset.0,
        map_offset_y = map_offset.1,
        "composed scene"
    );

    ComposedScene {
        root: SceneNode::new(NodeKind::Root, UnitRect::full()).with_children(children),
        map_offset,
    }
}
