//! Color values, color tokens, and the document color table.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed 24-bit RGB integer, the form the
    /// parser collaborator uses for color table keys.
    pub fn from_rgb_int(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Parse a hex color string (#RGB or #RRGGBB format).
    pub fn parse_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        if !s.starts_with('#') {
            return Err(format!("Color must start with #, got: {}", s));
        }
        let hex = &s[1..];
        // Guards the byte slicing below; hex digits are ASCII anyway.
        if !hex.is_ascii() {
            return Err(format!("Invalid hex color: non-ASCII content in {}", s));
        }

        match hex.len() {
            3 => {
                // #RGB format - expand each digit
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16)
                    .map_err(|e| format!("Invalid red component: {}", e))?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16)
                    .map_err(|e| format!("Invalid green component: {}", e))?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16)
                    .map_err(|e| format!("Invalid blue component: {}", e))?;
                Ok(Color { r, g, b })
            }
            6 => {
                // #RRGGBB format
                let r = u8::from_str_radix(&hex[0..2], 16)
                    .map_err(|e| format!("Invalid red component: {}", e))?;
                let g = u8::from_str_radix(&hex[2..4], 16)
                    .map_err(|e| format!("Invalid green component: {}", e))?;
                let b = u8::from_str_radix(&hex[4..6], 16)
                    .map_err(|e| format!("Invalid blue component: {}", e))?;
                Ok(Color { r, g, b })
            }
            _ => Err(format!(
                "Invalid hex color length: expected 3 or 6, got {}",
                hex.len()
            )),
        }
    }

    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color reference as it appears on the wire: a palette index, a
/// literal RGB triple, or a literal color string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorToken {
    Index(u32),
    Rgb([u8; 3]),
    Literal(String),
}

/// The document color table.
///
/// The wire form maps a packed RGB integer (as a decimal string key) to
/// its palette index, so resolving an index token means finding the entry
/// whose *value* matches. A reverse map (index -> color) is built once at
/// load so per-run resolution stays O(1) instead of scanning the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorTable {
    entries: HashMap<String, u32>,
    by_index: HashMap<u32, Color>,
}

impl ColorTable {
    pub fn from_entries(entries: HashMap<String, u32>) -> Self {
        let mut by_index = HashMap::with_capacity(entries.len());
        for (key, index) in &entries {
            match key.parse::<u32>() {
                Ok(packed) => {
                    by_index.insert(*index, Color::from_rgb_int(packed));
                }
                Err(_) => {
                    log::warn!("ignoring color table entry with non-numeric key '{}'", key);
                }
            }
        }
        Self { entries, by_index }
    }

    pub fn lookup(&self, index: u32) -> Option<Color> {
        self.by_index.get(&index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ColorTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Only the wire entries serialize; the reverse index is rebuilt on load.
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ColorTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Tolerate non-numeric index values by deserializing loosely first.
        let raw: HashMap<String, serde_json::Value> = HashMap::deserialize(deserializer)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            match value.as_u64() {
                Some(index) => {
                    entries.insert(key, index as u32);
                }
                None => {
                    return Err(de::Error::custom(format!(
                        "color table index for '{}' is not an unsigned integer",
                        key
                    )));
                }
            }
        }
        Ok(Self::from_entries(entries))
    }
}
