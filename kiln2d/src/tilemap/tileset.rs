use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TilemapError;
use crate::math::Vec2;
use crate::render::TextureHandle;

use super::data::{decode_properties, PropertyValue, TilesetData};

const HORIZONTAL_FLIP: u32 = 0x8000_0000;
const VERTICAL_FLIP: u32 = 0x4000_0000;
const DIAGONAL_FLIP: u32 = 0x2000_0000;
const FLAG_MASK: u32 = HORIZONTAL_FLIP | VERTICAL_FLIP | DIAGONAL_FLIP;

/// Transform flags packed into the top 3 bits of a raw GID.
///
/// Rotations are composed out of the diagonal flip (axis swap) plus one or
/// two mirror flags, matching the editor's encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GidFlags {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl GidFlags {
    /// Splits a raw GID into its transform flags and the cleared map-global id.
    pub fn decode(raw: u32) -> (Self, u32) {
        let flags = Self {
            horizontal: raw & HORIZONTAL_FLIP != 0,
            vertical: raw & VERTICAL_FLIP != 0,
            diagonal: raw & DIAGONAL_FLIP != 0,
        };
        (flags, raw & !FLAG_MASK)
    }

    /// Re-applies the flag bits onto a cleared gid. `decode` then `apply`
    /// reproduces the original value bit-exactly.
    pub fn apply(self, gid: u32) -> u32 {
        gid | self.bits()
    }

    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.horizontal {
            bits |= HORIZONTAL_FLIP;
        }
        if self.vertical {
            bits |= VERTICAL_FLIP;
        }
        if self.diagonal {
            bits |= DIAGONAL_FLIP;
        }
        bits
    }

    pub fn any(self) -> bool {
        self.horizontal || self.vertical || self.diagonal
    }
}

/// One animation step for a tile: which tile to show and for how long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileFrame {
    pub tile_id: u32,
    pub duration_ms: u32,
}

/// A named collection of same-sized tiles sharing one texture atlas.
/// Immutable after load.
#[derive(Debug)]
pub struct Tileset {
    pub name: String,
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_count: u32,
    pub texture: TextureHandle,
    /// Per-tile property tables, keyed by local tile id.
    pub properties: HashMap<u32, HashMap<String, PropertyValue>>,
    /// Per-tile animation frame tables, keyed by local tile id.
    pub animations: HashMap<u32, Vec<TileFrame>>,
}

impl Tileset {
    pub fn from_data(data: TilesetData, texture: TextureHandle) -> Self {
        let mut properties = HashMap::new();
        let mut animations = HashMap::new();
        for tile in &data.tiles {
            if !tile.properties.is_empty() {
                properties.insert(tile.id, decode_properties(&tile.properties));
            }
            if !tile.animation.is_empty() {
                animations.insert(
                    tile.id,
                    tile.animation
                        .iter()
                        .map(|f| TileFrame {
                            tile_id: f.tileid,
                            duration_ms: f.duration,
                        })
                        .collect(),
                );
            }
        }
        Self {
            name: data.name,
            columns: data.columns,
            rows: data.tilecount.div_ceil(data.columns.max(1)),
            tile_width: data.tilewidth,
            tile_height: data.tileheight,
            tile_count: data.tilecount,
            texture,
            properties,
            animations,
        }
    }

    pub fn from_json(json: &str, texture: TextureHandle) -> Result<Self, TilemapError> {
        let data: TilesetData = serde_json::from_str(json)?;
        Ok(Self::from_data(data, texture))
    }

    /// Top-left corner of a tile's rectangle in the atlas, in pixels.
    pub fn tex_origin(&self, local_id: u32) -> Vec2 {
        Vec2::new(
            ((local_id % self.columns) * self.tile_width) as f32,
            ((local_id / self.columns) * self.tile_height) as f32,
        )
    }
}

/// A [`Tileset`] bound into a specific map's global-ID space.
#[derive(Clone, Debug)]
pub struct MapTileset {
    pub tileset: Arc<Tileset>,
    pub first_gid: u32,
    pub last_gid: u32,
}

impl MapTileset {
    pub fn new(tileset: Arc<Tileset>, first_gid: u32) -> Self {
        let last_gid = first_gid + tileset.tile_count - 1;
        Self {
            tileset,
            first_gid,
            last_gid,
        }
    }

    pub fn contains(&self, gid: u32) -> bool {
        self.first_gid <= gid && gid <= self.last_gid
    }
}

/// A raw GID resolved against a map's tileset list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedTile {
    /// Index into the map's `tilesets` list.
    pub tileset: usize,
    /// Tile index local to that tileset.
    pub local_id: u32,
    pub flags: GidFlags,
}

/// Texture coordinates of a tile quad with its transform flags applied.
///
/// The diagonal flip transposes first (corners 0 and 2 trade places), then
/// the horizontal/vertical mirrors offset through the already-remapped corner
/// indices. The order is load-bearing: rotation is encoded as diagonal plus
/// mirror flags.
pub fn transformed_tex_coords(
    origin: Vec2,
    tile_width: f32,
    tile_height: f32,
    flags: GidFlags,
) -> [Vec2; 4] {
    let mut tex = [
        origin,
        origin + Vec2::new(tile_width, 0.0),
        origin + Vec2::new(tile_width, tile_height),
        origin + Vec2::new(0.0, tile_height),
    ];
    let mut modifier = [Vec2::ZERO; 4];
    let (mut i0, i1, mut i2, i3) = (0usize, 1usize, 2usize, 3usize);
    if flags.diagonal {
        i0 = 2;
        i2 = 0;
        tex.swap(0, 2);
    }
    if flags.horizontal {
        modifier[i0] += Vec2::new(tile_width, 0.0);
        modifier[i1] += Vec2::new(-tile_width, 0.0);
        modifier[i2] += Vec2::new(-tile_width, 0.0);
        modifier[i3] += Vec2::new(tile_width, 0.0);
    }
    if flags.vertical {
        modifier[i0] += Vec2::new(0.0, tile_height);
        modifier[i1] += Vec2::new(0.0, tile_height);
        modifier[i2] += Vec2::new(0.0, -tile_height);
        modifier[i3] += Vec2::new(0.0, -tile_height);
    }
    [
        tex[0] + modifier[0],
        tex[1] + modifier[1],
        tex[2] + modifier[2],
        tex[3] + modifier[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gid_flags_round_trip() {
        let raw = 0xE000_0000u32 | 5;
        let (flags, gid) = GidFlags::decode(raw);
        assert!(flags.horizontal && flags.vertical && flags.diagonal);
        assert_eq!(gid, 5);
        assert_eq!(flags.apply(gid), raw);

        let (none, plain) = GidFlags::decode(42);
        assert!(!none.any());
        assert_eq!(none.apply(plain), 42);
    }

    #[test]
    fn horizontal_flip_mirrors_left_right() {
        let flags = GidFlags {
            horizontal: true,
            ..GidFlags::default()
        };
        let coords = transformed_tex_coords(Vec2::ZERO, 16.0, 16.0, flags);
        assert_eq!(coords[0], Vec2::new(16.0, 0.0));
        assert_eq!(coords[1], Vec2::new(0.0, 0.0));
        assert_eq!(coords[2], Vec2::new(0.0, 16.0));
        assert_eq!(coords[3], Vec2::new(16.0, 16.0));
    }

    #[test]
    fn diagonal_flip_swaps_opposite_corners() {
        let flags = GidFlags {
            diagonal: true,
            ..GidFlags::default()
        };
        let coords = transformed_tex_coords(Vec2::ZERO, 16.0, 16.0, flags);
        assert_eq!(coords[0], Vec2::new(16.0, 16.0));
        assert_eq!(coords[2], Vec2::new(0.0, 0.0));
        // The other diagonal is untouched.
        assert_eq!(coords[1], Vec2::new(16.0, 0.0));
        assert_eq!(coords[3], Vec2::new(0.0, 16.0));
    }
}
