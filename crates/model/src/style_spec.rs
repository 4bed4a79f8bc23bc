//! Style tokens: inline 4-tuple descriptors or indexes into a style table.

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A concrete style descriptor: `[font name, size, bold flag, italic flag]`.
///
/// The wire form is a heterogeneous JSON array with at least four
/// elements; anything past the fourth is ignored. Flags are truthy
/// numbers (1 = set), matching the parser collaborator's records.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub font_name: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Serialize for StyleSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.font_name)?;
        seq.serialize_element(&self.size)?;
        seq.serialize_element(&u8::from(self.bold))?;
        seq.serialize_element(&u8::from(self.italic))?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for StyleSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SpecVisitor;

        impl<'de> Visitor<'de> for SpecVisitor {
            type Value = StyleSpec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a style array [font, size, bold, italic]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let font: Option<serde_json::Value> = seq.next_element()?;
                let size: Option<serde_json::Value> = seq.next_element()?;
                let bold: Option<serde_json::Value> = seq.next_element()?;
                let italic: Option<serde_json::Value> = seq.next_element()?;

                // Anything past the four known slots is ignored.
                while seq.next_element::<serde_json::Value>()?.is_some() {}

                let (Some(font), Some(size), Some(bold), Some(italic)) =
                    (font, size, bold, italic)
                else {
                    return Err(serde::de::Error::invalid_length(
                        0,
                        &"a style array of length >= 4",
                    ));
                };

                Ok(StyleSpec {
                    font_name: font.as_str().unwrap_or_default().to_string(),
                    size: size.as_f64().unwrap_or_default() as f32,
                    bold: truthy(&bold),
                    italic: truthy(&italic),
                })
            }
        }

        deserializer.deserialize_seq(SpecVisitor)
    }
}

fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0) == 1.0,
        _ => false,
    }
}

/// A style reference as it appears on the wire: an index into a style
/// table when it is a bare integer, otherwise an inline descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleToken {
    Index(usize),
    Inline(StyleSpec),
}
