//! The page compositor: one page record in, one render tree out.

use crate::scale::device_scale;
use crate::tree::{
    BackgroundNode, ComposeMode, FillNode, ImageNode, OutlineNode, PxRect, RenderNode, RenderTree,
    RuleNode, RuleOrientation, RunNode, TextBlockNode,
};
use folio_model::{percent, Color, ColorTable, Document, Page, RunAddress, Rule, StyleSpec, TextItem};
use folio_style::{resolve_color, resolve_style};

/// Page dimensions assumed when the parse supplied none, in document units.
const DEFAULT_PAGE_WIDTH: f32 = 800.0;
const DEFAULT_PAGE_HEIGHT: f32 = 1100.0;

/// Rule thickness assumed when the parse supplied none, in document units.
const DEFAULT_RULE_THICKNESS: f32 = 2.0;

/// Unpositioned images stack below this inset with a fixed gap, in
/// device pixels.
const IMAGE_INSET_PX: f32 = 40.0;
const IMAGE_STACK_GAP_PX: f32 = 10.0;

/// Composes pages of one document. Holds only shared read-only document
/// state (color table, global style table), so a single compositor can
/// serve every page of the snapshot it was built for.
pub struct Compositor<'a> {
    colors: &'a ColorTable,
    global_styles: &'a [StyleSpec],
}

impl<'a> Compositor<'a> {
    pub fn for_document(document: &'a Document) -> Self {
        Self {
            colors: &document.color_table,
            global_styles: &document.style_table,
        }
    }

    /// Compose one page at the given zoom. Back-to-front order:
    /// background, horizontal rules, vertical rules, fills, outlines,
    /// text blocks, images. Idempotent: identical inputs yield an
    /// identical tree, including run addresses.
    pub fn compose(
        &self,
        page: &Page,
        page_index: usize,
        zoom: f32,
        mode: ComposeMode,
    ) -> RenderTree {
        let scale = device_scale(zoom);
        let mut nodes = Vec::new();

        if let Some(background) = &page.vector_background {
            nodes.push(RenderNode::Background(BackgroundNode {
                markup: background.markup.clone(),
                width: page.width.unwrap_or(DEFAULT_PAGE_WIDTH) * scale,
                height: page.height.unwrap_or(DEFAULT_PAGE_HEIGHT) * scale,
            }));
        }

        for rule in &page.h_lines {
            if let Some(node) = self.rule_node(rule, RuleOrientation::Horizontal, scale) {
                nodes.push(RenderNode::Rule(node));
            }
        }
        for rule in &page.v_lines {
            if let Some(node) = self.rule_node(rule, RuleOrientation::Vertical, scale) {
                nodes.push(RenderNode::Rule(node));
            }
        }

        for fill in &page.fills {
            let (Some(x), Some(y), Some(w), Some(h)) = (fill.x, fill.y, fill.width, fill.height)
            else {
                log::debug!("skipping fill with missing geometry on page {}", page_index);
                continue;
            };
            let rect = PxRect::new(x * scale, y * scale, w * scale, h * scale);
            if !rect.is_finite() {
                log::debug!("skipping fill with non-finite geometry on page {}", page_index);
                continue;
            }
            nodes.push(RenderNode::Fill(FillNode {
                rect,
                color: resolve_color(fill.color.as_ref(), self.colors),
            }));
        }

        for boxset in &page.boxsets {
            if let Some(rect) = outline_rect(boxset.x, boxset.y, boxset.width, boxset.height, scale)
            {
                nodes.push(RenderNode::Outline(OutlineNode { rect }));
            }
            for b in &boxset.boxes {
                if let Some(rect) = outline_rect(b.x, b.y, b.width, b.height, scale) {
                    nodes.push(RenderNode::Outline(OutlineNode { rect }));
                }
            }
        }

        for (item_index, item) in page.texts.iter().enumerate() {
            nodes.push(RenderNode::Text(self.text_block(
                page,
                item,
                page_index,
                item_index,
                scale,
                mode,
            )));
        }

        let mut stack_offset = 0.0;
        for image in &page.images {
            let (Some(w), Some(h)) = (image.width, image.height) else {
                log::debug!("skipping image with missing dimensions on page {}", page_index);
                continue;
            };
            let rect = PxRect::new(
                IMAGE_INSET_PX,
                IMAGE_INSET_PX + stack_offset,
                w * scale,
                h * scale,
            );
            if !rect.is_finite() {
                log::debug!("skipping image with non-finite dimensions on page {}", page_index);
                continue;
            }
            stack_offset += h * scale + IMAGE_STACK_GAP_PX;
            let ext = if image.ext.is_empty() { "png" } else { &image.ext };
            nodes.push(RenderNode::Image(ImageNode {
                rect,
                data_uri: format!("data:image/{};base64,{}", ext, image.base64),
            }));
        }

        log::debug!(
            "composed page {} at zoom {}: {} nodes",
            page_index,
            zoom,
            nodes.len()
        );

        RenderTree {
            page_index,
            width_px: page.width.unwrap_or(DEFAULT_PAGE_WIDTH) * scale,
            height_px: page.height.unwrap_or(DEFAULT_PAGE_HEIGHT) * scale,
            nodes,
        }
    }

    fn rule_node(
        &self,
        rule: &Rule,
        orientation: RuleOrientation,
        scale: f32,
    ) -> Option<RuleNode> {
        let (Some(x), Some(y), Some(length)) = (rule.x, rule.y, rule.length) else {
            log::debug!("skipping rule with missing geometry");
            return None;
        };
        let thickness = rule.thickness.unwrap_or(DEFAULT_RULE_THICKNESS);

        let rect = match orientation {
            RuleOrientation::Horizontal => {
                PxRect::new(x * scale, y * scale, length * scale, thickness * scale)
            }
            RuleOrientation::Vertical => {
                PxRect::new(x * scale, y * scale, thickness * scale, length * scale)
            }
        };
        if !rect.is_finite() {
            log::debug!("skipping rule with non-finite geometry");
            return None;
        }

        Some(RuleNode {
            rect,
            color: resolve_color(rule.color.as_ref(), self.colors),
            dashed: rule.is_dashed(),
            orientation,
        })
    }

    fn text_block(
        &self,
        page: &Page,
        item: &TextItem,
        page_index: usize,
        item_index: usize,
        scale: f32,
        mode: ComposeMode,
    ) -> TextBlockNode {
        // Paragraph breaks keep their slot in the item index space but
        // carry no visible, editable content.
        let is_break = item.is_paragraph_break();

        let runs = if is_break {
            Vec::new()
        } else {
            item.runs
                .iter()
                .enumerate()
                .map(|(run_index, run)| RunNode {
                    address: RunAddress::new(page_index, item_index, run_index),
                    text: percent::decode(&run.text),
                    style: resolve_style(
                        run.style.as_ref(),
                        &page.style_table,
                        self.global_styles,
                        scale,
                    ),
                })
                .collect()
        };

        let color = item
            .color_override
            .as_deref()
            .and_then(|s| Color::parse_hex(s).ok())
            .unwrap_or_else(|| resolve_color(item.color.as_ref(), self.colors));

        TextBlockNode {
            x: item.x * scale,
            y: item.y * scale,
            width: item.width.map(|w| w * scale),
            color,
            align: item.align,
            editable: mode == ComposeMode::Interactive && !is_break,
            runs,
        }
    }
}

fn outline_rect(
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    scale: f32,
) -> Option<PxRect> {
    let (Some(x), Some(y), Some(w), Some(h)) = (x, y, width, height) else {
        return None;
    };
    let rect = PxRect::new(x * scale, y * scale, w * scale, h * scale);
    rect.is_finite().then_some(rect)
}
