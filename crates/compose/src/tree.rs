//! The composed render tree: positioned primitives in back-to-front order.

use folio_model::{Color, RunAddress, TextAlign};
use folio_style::ResolvedTextStyle;
use serde::{Deserialize, Serialize};

/// Whether text containers compose as editable surfaces or read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComposeMode {
    ReadOnly,
    Interactive,
}

/// A rectangle in device-pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PxRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// One composed page, ready for display. Nodes are ordered back to
/// front; composing the same inputs twice yields an identical tree,
/// including identical run addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    pub page_index: usize,
    pub width_px: f32,
    pub height_px: f32,
    pub nodes: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderNode {
    Background(BackgroundNode),
    Rule(RuleNode),
    Fill(FillNode),
    Outline(OutlineNode),
    Text(TextBlockNode),
    Image(ImageNode),
}

/// Full-page vector underlay; always beneath other content and never
/// interactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundNode {
    pub markup: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleNode {
    pub rect: PxRect,
    pub color: Color,
    pub dashed: bool,
    pub orientation: RuleOrientation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillNode {
    pub rect: PxRect,
    pub color: Color,
}

/// A decorative form-field/box outline; non-interactive in both modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub rect: PxRect,
}

/// One positioned text item holding one styled run per inline element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlockNode {
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub color: Color,
    pub align: TextAlign,
    pub editable: bool,
    pub runs: Vec<RunNode>,
}

/// One styled run carrying its stable address for edit capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunNode {
    pub address: RunAddress,
    pub text: String,
    pub style: ResolvedTextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    pub rect: PxRect,
    pub data_uri: String,
}
