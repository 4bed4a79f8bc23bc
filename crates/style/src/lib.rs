//! Style and color token resolution.
//!
//! Turns the wire tokens carried by runs and primitives (inline style
//! descriptors, style table indexes, palette indexes, literal colors)
//! into concrete rendering attributes. Resolution never fails: an
//! unresolvable token falls back to the fixed default instead.

pub mod font;
pub mod resolver;

pub use font::{FontStyle, FontWeight};
pub use resolver::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PX, ResolvedTextStyle, resolve_color, resolve_style,
};
