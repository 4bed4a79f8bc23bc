//! Resolution of style and color tokens into concrete attributes.
//!
//! A style token is either an inline `[font, size, bold, italic]`
//! descriptor or an index into a style table; the page-local table is
//! consulted before the global one. Table entries are themselves
//! concrete descriptors, so indirection is one level deep and cannot
//! loop. Color tokens resolve through the document color table's
//! reverse index, then literal forms, then default black.

use crate::font::{FontStyle, FontWeight};
use folio_model::{Color, ColorTable, ColorToken, StyleSpec, StyleToken};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Concrete, renderable text attributes for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTextStyle {
    pub font_family: String,
    pub font_size_px: f32,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl Default for ResolvedTextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size_px: DEFAULT_FONT_SIZE_PX,
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
        }
    }
}

/// Resolve a style token against the page and global style tables.
///
/// `scale` is the device-pixel scale for the current zoom; the resolved
/// size is already in device pixels. An unresolvable token (missing,
/// out-of-bounds index) yields the default style.
pub fn resolve_style(
    token: Option<&StyleToken>,
    page_styles: &[StyleSpec],
    global_styles: &[StyleSpec],
    scale: f32,
) -> ResolvedTextStyle {
    let spec = match token {
        Some(StyleToken::Inline(spec)) => Some(spec),
        Some(StyleToken::Index(index)) => {
            // Page-local table overrides/extends the global one.
            let spec = page_styles
                .get(*index)
                .or_else(|| global_styles.get(*index));
            if spec.is_none() {
                log::debug!("style index {} out of bounds, using default style", index);
            }
            spec
        }
        None => None,
    };

    let Some(spec) = spec else {
        return ResolvedTextStyle::default();
    };

    let (family, inferred_weight, inferred_style) = parse_font_name(&spec.font_name);

    ResolvedTextStyle {
        font_family: family,
        font_size_px: if spec.size > 0.0 {
            spec.size * scale
        } else {
            DEFAULT_FONT_SIZE_PX
        },
        // Explicit flags always win over the name-derived inference.
        weight: if spec.bold { FontWeight::Bold } else { inferred_weight },
        style: if spec.italic { FontStyle::Italic } else { inferred_style },
    }
}

/// Infer family, weight, and slant from a font name like
/// `Courier_Bold-Oblique`. The first segment is the family; any segment
/// containing "bold" bumps the weight, "italic"/"oblique" the slant.
fn parse_font_name(name: &str) -> (String, FontWeight, FontStyle) {
    let mut parts = name.split(['-', '_']);

    let family = match parts.next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => DEFAULT_FONT_FAMILY.to_string(),
    };

    let mut weight = FontWeight::Regular;
    let mut style = FontStyle::Normal;
    for part in name.split(['-', '_']) {
        let lower = part.to_lowercase();
        if lower.contains("bold") {
            weight = FontWeight::Bold;
        }
        if lower.contains("italic") || lower.contains("oblique") {
            style = FontStyle::Italic;
        }
    }

    (family, weight, style)
}

/// Resolve a color token: palette index, then literal RGB triple, then
/// literal string, then black.
pub fn resolve_color(token: Option<&ColorToken>, colors: &ColorTable) -> Color {
    match token {
        Some(ColorToken::Index(index)) => colors.lookup(*index).unwrap_or(Color::BLACK),
        Some(ColorToken::Rgb([r, g, b])) => Color::new(*r, *g, *b),
        Some(ColorToken::Literal(s)) => Color::parse_hex(s).unwrap_or(Color::BLACK),
        None => Color::BLACK,
    }
}
