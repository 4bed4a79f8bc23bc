//! Document snapshot model for the folio engine.
//!
//! This crate defines the in-memory representation of a parsed page
//! description: pages of text items and vector primitives, the global
//! color table, style tables, and the run addressing scheme shared by
//! the compositor and the edit engine. The wire shape follows the
//! parser collaborator's JSON records; every optional field degrades
//! to "no content of that kind" rather than failing the load.

pub mod address;
pub mod color;
pub mod document;
pub mod percent;
pub mod style_spec;

pub use address::{AddressParseError, RunAddress};
pub use color::{Color, ColorTable, ColorToken};
pub use document::{
    BoxOutline, Boxset, Document, Fill, Image, PARAGRAPH_BREAK, Page, Rule, Run, TextAlign,
    TextItem, VectorBackground,
};
pub use style_spec::{StyleSpec, StyleToken};
