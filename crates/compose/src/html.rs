//! HTML serialization of a composed render tree.
//!
//! The DOM-facing layer: absolute positioning, inline styles, and the
//! run address carried on every text span as a `data-addr` attribute so
//! the edit-capture signal can round-trip it back. Editable runs get
//! `contenteditable`; everything else is pointer-inert.

use crate::tree::{RenderNode, RenderTree, RuleOrientation, TextBlockNode};
use std::fmt::Write;

/// Render a composed page to an HTML fragment.
pub fn render_html(tree: &RenderTree) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class=\"folio-page\" data-page=\"{}\" style=\"position:relative;width:{}px;height:{}px;background:#fff\">",
        tree.page_index, tree.width_px, tree.height_px
    );

    for node in &tree.nodes {
        match node {
            RenderNode::Background(bg) => {
                let _ = write!(
                    out,
                    "<div style=\"position:absolute;left:0;top:0;width:{}px;height:{}px;pointer-events:none\">{}</div>",
                    bg.width, bg.height, bg.markup
                );
            }
            RenderNode::Rule(rule) => {
                let dash = match (rule.dashed, rule.orientation) {
                    (true, RuleOrientation::Horizontal) => ";border-bottom:1px dashed #000",
                    (true, RuleOrientation::Vertical) => ";border-right:1px dashed #000",
                    (false, _) => "",
                };
                let _ = write!(
                    out,
                    "<div style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{};opacity:0.7;pointer-events:none{}\"></div>",
                    rule.rect.x,
                    rule.rect.y,
                    rule.rect.width,
                    rule.rect.height,
                    rule.color.to_hex_string(),
                    dash
                );
            }
            RenderNode::Fill(fill) => {
                let _ = write!(
                    out,
                    "<div style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{};opacity:0.3;pointer-events:none\"></div>",
                    fill.rect.x,
                    fill.rect.y,
                    fill.rect.width,
                    fill.rect.height,
                    fill.color.to_hex_string()
                );
            }
            RenderNode::Outline(outline) => {
                let _ = write!(
                    out,
                    "<div style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;border:1px solid #888;pointer-events:none\"></div>",
                    outline.rect.x, outline.rect.y, outline.rect.width, outline.rect.height
                );
            }
            RenderNode::Text(block) => render_text_block(&mut out, block),
            RenderNode::Image(image) => {
                let _ = write!(
                    out,
                    "<img src=\"{}\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{}px\"/>",
                    escape(&image.data_uri),
                    image.rect.x,
                    image.rect.y,
                    image.rect.width,
                    image.rect.height
                );
            }
        }
    }

    out.push_str("</div>");
    out
}

fn render_text_block(out: &mut String, block: &TextBlockNode) {
    let align = format!("{:?}", block.align).to_lowercase();
    let width = block
        .width
        .map(|w| format!("width:{}px;", w))
        .unwrap_or_default();
    let interactivity = if block.editable {
        ""
    } else {
        "pointer-events:none;"
    };
    let _ = write!(
        out,
        "<div style=\"position:absolute;left:{}px;top:{}px;{}color:{};text-align:{};white-space:pre;{}\">",
        block.x,
        block.y,
        width,
        block.color.to_hex_string(),
        align,
        interactivity
    );

    for run in &block.runs {
        let editable = if block.editable {
            " contenteditable=\"true\""
        } else {
            ""
        };
        let weight = if run.style.weight.is_bold() { "bold" } else { "normal" };
        let slant = if run.style.style.is_italic() { "italic" } else { "normal" };
        let _ = write!(
            out,
            "<span data-addr=\"{}\"{} style=\"font-family:{};font-size:{}px;font-weight:{};font-style:{}\">{}</span>",
            run.address,
            editable,
            escape(&run.style.font_family),
            run.style.font_size_px,
            weight,
            slant,
            escape(&run.text)
        );
    }

    out.push_str("</div>");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;
    use crate::tree::ComposeMode;
    use folio_model::Document;
    use serde_json::json;

    fn document() -> Document {
        Document::from_payload(json!({
            "pages": [{
                "Width": 100,
                "Height": 100,
                "Texts": [{
                    "x": 1, "y": 2, "w": 50,
                    "R": [{ "T": "a%20%3C%20b", "TS": ["Helvetica", 10, 0, 0] }]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_addresses_round_trip_through_markup() {
        let doc = document();
        let tree = Compositor::for_document(&doc).compose(
            &doc.pages[0],
            2,
            1.0,
            ComposeMode::Interactive,
        );
        let html = render_html(&tree);
        assert!(html.contains("data-addr=\"p2t0r0\""));
        assert!(html.contains("contenteditable=\"true\""));
        // The decoded text is escaped for markup.
        assert!(html.contains(">a &lt; b</span>"));
    }

    #[test]
    fn test_read_only_markup_is_inert() {
        let doc = document();
        let tree = Compositor::for_document(&doc).compose(
            &doc.pages[0],
            0,
            1.0,
            ComposeMode::ReadOnly,
        );
        let html = render_html(&tree);
        assert!(!html.contains("contenteditable"));
        assert!(html.contains("pointer-events:none"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_image_source_cannot_break_out_of_its_attribute() {
        let doc = Document::from_payload(json!({
            "pages": [{
                "images": [{
                    "base64": "QUJD",
                    "ext": "png\" onerror=\"alert(1)",
                    "width": 10,
                    "height": 10
                }]
            }]
        }))
        .unwrap();
        let tree = Compositor::for_document(&doc).compose(
            &doc.pages[0],
            0,
            1.0,
            ComposeMode::ReadOnly,
        );
        let html = render_html(&tree);
        assert!(!html.contains("onerror=\"alert"));
        assert!(html.contains("png&quot; onerror=&quot;alert(1)"));
    }

    #[test]
    fn test_dashed_border_side_follows_orientation() {
        let doc = Document::from_payload(json!({
            "pages": [{
                "HLines": [{ "x": 0, "y": 10, "l": 50, "w": 1, "dsh": 1 }],
                "VLines": [{ "x": 10, "y": 0, "l": 50, "w": 1, "dsh": 1 }]
            }]
        }))
        .unwrap();
        let tree = Compositor::for_document(&doc).compose(
            &doc.pages[0],
            0,
            1.0,
            ComposeMode::ReadOnly,
        );
        let html = render_html(&tree);
        assert!(html.contains("border-bottom:1px dashed"));
        assert!(html.contains("border-right:1px dashed"));
    }
}
