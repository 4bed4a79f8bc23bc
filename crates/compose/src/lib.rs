//! Page composition.
//!
//! Maps one page record into an ordered, back-to-front list of
//! positioned visual primitives at the requested zoom: vector
//! background, rules, fills, outlines, text blocks with per-run styling,
//! and embedded images. Composition is lazy (one page at a time),
//! idempotent, and side-effect free; the `html` module serializes a
//! composed tree for a DOM host.

pub mod compositor;
pub mod html;
pub mod scale;
pub mod tree;

pub use compositor::Compositor;
pub use html::render_html;
pub use scale::{BASE_SCALE, device_scale, to_device_pixels};
pub use tree::{
    BackgroundNode, ComposeMode, FillNode, ImageNode, OutlineNode, PxRect, RenderNode, RenderTree,
    RuleNode, RuleOrientation, RunNode, TextBlockNode,
};
