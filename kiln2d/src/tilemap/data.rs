//! Raw boundary documents for maps and tilesets.
//!
//! These mirror the JSON export of the map editor one-to-one and are decoded
//! with serde before being validated into the engine types. Asset I/O stays
//! external: callers hand in document strings and texture handles.

use serde::Deserialize;

use crate::render::Color;

#[derive(Debug, Deserialize)]
pub struct MapData {
    /// Canvas size in tiles.
    pub width: u32,
    pub height: u32,
    /// Tile size in pixels.
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
    #[serde(default)]
    pub layers: Vec<LayerData>,
}

/// Binds an external tileset document into the map's global-ID space.
#[derive(Debug, Deserialize)]
pub struct TilesetRef {
    pub firstgid: u32,
    pub source: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum LayerData {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayerData),
    #[serde(rename = "objectgroup")]
    Objects(ObjectGroupData),
}

#[derive(Debug, Deserialize)]
pub struct TileLayerData {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Flat row-major GID array; the 3 high bits of each entry are transform
    /// flags.
    pub data: Vec<u32>,
    /// Raw visibility attribute. The editor only writes it for hidden layers,
    /// so presence means "hidden" — see [`super::TileLayer::from_data`].
    #[serde(default)]
    pub visible: Option<String>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectGroupData {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectData {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Missing dimensions default to zero so point-like rectangle objects
    /// survive loading.
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub point: bool,
    #[serde(default)]
    pub ellipse: bool,
    #[serde(default)]
    pub polygon: Option<Vec<PointData>>,
    #[serde(default)]
    pub polyline: Option<Vec<PointData>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointData {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize)]
pub struct TilesetData {
    pub name: String,
    pub columns: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub tilecount: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tiles: Vec<TileData>,
}

/// Per-tile extras inside a tileset document.
#[derive(Debug, Deserialize)]
pub struct TileData {
    pub id: u32,
    #[serde(default)]
    pub animation: Vec<FrameData>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FrameData {
    pub tileid: u32,
    pub duration: u32,
}

/// A typed key/value pair as written by the editor.
#[derive(Debug, Deserialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// A decoded property value attached to a layer or a tileset tile.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Color(Color),
}

impl PropertyValue {
    pub fn from_raw(raw: &RawProperty) -> Self {
        match raw.kind.as_deref() {
            Some("bool") => Self::Bool(raw.value.as_bool().unwrap_or(false)),
            Some("int") => Self::Int(raw.value.as_i64().unwrap_or(0)),
            Some("float") => Self::Float(raw.value.as_f64().unwrap_or(0.0)),
            Some("color") => {
                let hex = raw.value.as_str().unwrap_or("");
                // Editor colors are #rrggbbaa.
                Self::Color(parse_property_color(hex).unwrap_or(Color::TRANSPARENT))
            }
            _ => Self::Str(raw.value.as_str().unwrap_or("").to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

fn parse_property_color(hex: &str) -> Option<Color> {
    let stripped = hex.strip_prefix('#')?;
    if stripped.len() < 8 {
        return None;
    }
    let r = u8::from_str_radix(&stripped[0..2], 16).ok()?;
    let g = u8::from_str_radix(&stripped[2..4], 16).ok()?;
    let b = u8::from_str_radix(&stripped[4..6], 16).ok()?;
    let a = u8::from_str_radix(&stripped[6..8], 16).ok()?;
    Some(Color::rgba(r, g, b, a))
}

/// Decodes an ordered property list into a lookup table.
pub(crate) fn decode_properties(
    raw: &[RawProperty],
) -> std::collections::HashMap<String, PropertyValue> {
    raw.iter()
        .map(|p| (p.name.clone(), PropertyValue::from_raw(p)))
        .collect()
}
