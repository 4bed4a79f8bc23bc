//! The document snapshot: pages, text items, runs, and vector primitives.
//!
//! Field names mirror the parser collaborator's JSON records (`Texts`,
//! `HLines`, `R`, `TS`, ...). Every optional field is deserialized
//! leniently: a missing or malformed value degrades to the default for
//! that kind of content instead of failing the whole load.

use crate::address::RunAddress;
use crate::color::{ColorTable, ColorToken};
use crate::style_spec::{StyleSpec, StyleToken};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// The carriage-return sentinel marking a layout-only paragraph break.
pub const PARAGRAPH_BREAK: &str = "\r";

/// Deserialize a field tolerantly: a malformed value becomes the default
/// for the target type rather than aborting the document load.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A full parsed document: the single source of truth for both the
/// rendering loop and the edit loop. Snapshots are never mutated in
/// place; a commit produces a replacement document wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient")]
    pub pages: Vec<Page>,
    #[serde(rename = "color_dict", default, deserialize_with = "lenient")]
    pub color_table: ColorTable,
    #[serde(
        rename = "style_dict",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub style_table: Vec<StyleSpec>,
}

impl Document {
    /// Load a document from the parsing collaborator's payload, which may
    /// be the document object itself or a one-element array of documents.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, serde_json::Error> {
        let value = match payload {
            serde_json::Value::Array(mut items) if !items.is_empty() => items.remove(0),
            other => other,
        };
        serde_json::from_value(value)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when the address points at an existing run in this snapshot.
    pub fn resolves(&self, address: RunAddress) -> bool {
        self.run_at(address).is_some()
    }

    pub fn run_at(&self, address: RunAddress) -> Option<&Run> {
        self.pages
            .get(address.page)?
            .texts
            .get(address.item)?
            .runs
            .get(address.run)
    }

    pub fn run_at_mut(&mut self, address: RunAddress) -> Option<&mut Run> {
        self.pages
            .get_mut(address.page)?
            .texts
            .get_mut(address.item)?
            .runs
            .get_mut(address.run)
    }
}

/// One document page. Dimensions are document units, not pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "Width", default, deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(rename = "Height", default, deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(rename = "Texts", default, deserialize_with = "lenient")]
    pub texts: Vec<TextItem>,
    #[serde(rename = "HLines", default, deserialize_with = "lenient")]
    pub h_lines: Vec<Rule>,
    #[serde(rename = "VLines", default, deserialize_with = "lenient")]
    pub v_lines: Vec<Rule>,
    #[serde(rename = "Fills", default, deserialize_with = "lenient")]
    pub fills: Vec<Fill>,
    #[serde(rename = "Boxsets", default, deserialize_with = "lenient")]
    pub boxsets: Vec<Boxset>,
    #[serde(default, deserialize_with = "lenient")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "lenient")]
    pub vector_background: Option<VectorBackground>,
    #[serde(
        rename = "style_dict",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub style_table: Vec<StyleSpec>,
}

/// A positioned group of runs sharing placement, alignment, and color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(default, deserialize_with = "lenient")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient")]
    pub y: f32,
    #[serde(rename = "w", default, deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(
        rename = "sw",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub space_width: Option<f32>,
    #[serde(rename = "clr", default, deserialize_with = "lenient")]
    pub color: Option<ColorToken>,
    #[serde(
        rename = "oc",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_override: Option<String>,
    #[serde(rename = "A", default, deserialize_with = "lenient")]
    pub align: TextAlign,
    #[serde(rename = "R", default, deserialize_with = "lenient")]
    pub runs: Vec<Run>,
}

impl TextItem {
    /// A zero-width item holding a single carriage-return run is a
    /// layout-only paragraph break, not visible content.
    pub fn is_paragraph_break(&self) -> bool {
        self.width.unwrap_or(0.0) == 0.0
            && self.runs.len() == 1
            && self.runs[0].text == PARAGRAPH_BREAK
    }
}

/// The smallest styled, addressable text unit. `text` stays in wire form
/// (percent-encoded); decoding happens at composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(rename = "T", default, deserialize_with = "lenient")]
    pub text: String,
    #[serde(rename = "TS", default, deserialize_with = "lenient")]
    pub style: Option<StyleToken>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A horizontal or vertical rule. `length` runs along the rule's axis,
/// `thickness` across it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(rename = "l", default, deserialize_with = "lenient")]
    pub length: Option<f32>,
    #[serde(rename = "w", default, deserialize_with = "lenient")]
    pub thickness: Option<f32>,
    #[serde(rename = "clr", default, deserialize_with = "lenient")]
    pub color: Option<ColorToken>,
    #[serde(rename = "dsh", default, deserialize_with = "lenient")]
    pub dashed: Option<u8>,
}

impl Rule {
    pub fn is_dashed(&self) -> bool {
        self.dashed == Some(1)
    }
}

/// A semi-transparent fill rectangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    #[serde(default, deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(rename = "w", default, deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(rename = "h", default, deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(rename = "clr", default, deserialize_with = "lenient")]
    pub color: Option<ColorToken>,
}

/// A form-field/box-set outline group. Decorative only: outlines render
/// in both modes but are never interactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boxset {
    #[serde(default, deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(rename = "w", default, deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(rename = "h", default, deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub boxes: Vec<BoxOutline>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxOutline {
    #[serde(default, deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(rename = "w", default, deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(rename = "h", default, deserialize_with = "lenient")]
    pub height: Option<f32>,
}

/// An embedded raster image: a base64 payload plus intrinsic dimensions
/// in document units. Images carry no explicit position; the compositor
/// stacks them with a fixed offset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, deserialize_with = "lenient")]
    pub base64: String,
    #[serde(default, deserialize_with = "lenient")]
    pub ext: String,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub xref: Option<u32>,
}

/// A pre-rendered vector underlay: an opaque markup blob positioned as a
/// full-page overlay beneath all other content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorBackground {
    #[serde(default, deserialize_with = "lenient")]
    pub markup: String,
}
