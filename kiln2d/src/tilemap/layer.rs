use std::collections::HashMap;

use crate::context::FrameContext;
use crate::math::{Rect, Vec2};
use crate::render::{Color, Drawable, RenderStates, RenderTarget, TextureHandle, Vertex};

use super::data::{decode_properties, ObjectGroupData, PropertyValue, TileLayerData};
use super::tileset::{transformed_tex_coords, GidFlags, MapTileset, TileFrame};

/// A resolved tile instance inside a [`TileLayer`].
///
/// Static tiles only exist inside their layer's per-texture batches; a
/// `LocalTile` is still kept per cell so collision or property lookups can go
/// from a grid coordinate back to the tile. Animated tiles additionally carry
/// one prebuilt quad per animation frame.
#[derive(Clone, Debug)]
pub struct LocalTile {
    /// Index into the owning map's tileset list.
    pub tileset: usize,
    /// Tile index local to that tileset.
    pub id: u32,
    /// Map-global id with transform flags cleared.
    pub gid: u32,
    pub flags: GidFlags,
    pub position: Vec2,
    pub texture: TextureHandle,
    quad: [Vertex; 4],
    frames: Vec<[Vertex; 4]>,
    anim: Vec<TileFrame>,
    frame_index: usize,
    clock_ms: f32,
}

impl LocalTile {
    fn build(
        tilesets: &[MapTileset],
        resolved: super::tileset::ResolvedTile,
        gid: u32,
        x: u32,
        y: u32,
    ) -> Self {
        let ts = &tilesets[resolved.tileset].tileset;
        let tile_w = ts.tile_width as f32;
        let tile_h = ts.tile_height as f32;
        let position = Vec2::new(x as f32 * tile_w, y as f32 * tile_h);

        let make_quad = |local_id: u32| -> [Vertex; 4] {
            let tex = transformed_tex_coords(
                ts.tex_origin(local_id),
                tile_w,
                tile_h,
                resolved.flags,
            );
            [
                Vertex::new(position, tex[0]),
                Vertex::new(position + Vec2::new(tile_w, 0.0), tex[1]),
                Vertex::new(position + Vec2::new(tile_w, tile_h), tex[2]),
                Vertex::new(position + Vec2::new(0.0, tile_h), tex[3]),
            ]
        };

        let quad = make_quad(resolved.local_id);
        let anim = ts
            .animations
            .get(&resolved.local_id)
            .cloned()
            .unwrap_or_default();
        let frames: Vec<[Vertex; 4]> = anim.iter().map(|f| make_quad(f.tile_id)).collect();

        Self {
            tileset: resolved.tileset,
            id: resolved.local_id,
            gid,
            flags: resolved.flags,
            position,
            texture: ts.texture,
            quad: if frames.is_empty() { quad } else { frames[0] },
            frames,
            anim,
            frame_index: 0,
            clock_ms: 0.0,
        }
    }

    pub fn animated(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// The quad currently representing this tile.
    pub fn vertices(&self) -> &[Vertex; 4] {
        &self.quad
    }

    /// Advances the animation clock. Tiles outside every camera window are
    /// never ticked; they resume from their last frame with no catch-up.
    pub fn update(&mut self, dt: f32) {
        if self.frames.is_empty() {
            return;
        }
        self.clock_ms += dt * 1000.0;
        if self.clock_ms > self.anim[self.frame_index].duration_ms as f32 {
            self.frame_index += 1;
            if self.frame_index > self.frames.len() - 1 {
                self.frame_index = 0;
            }
            self.quad = self.frames[self.frame_index];
            self.clock_ms = 0.0;
        }
    }
}

/// A grid of tiles parsed from one map layer.
#[derive(Debug)]
pub struct TileLayer {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub properties: HashMap<String, PropertyValue>,
    tiles: Vec<Vec<Option<LocalTile>>>,
    /// Static quads grouped per texture actually used, to keep draw calls at
    /// one per atlas.
    batches: Vec<(TextureHandle, Vec<Vertex>)>,
    /// Cells holding animated tiles, excluded from the static batches.
    animated: Vec<(u32, u32)>,
}

impl TileLayer {
    /// Parses a raw layer against the map's tileset list.
    ///
    /// Cells with gid 0 stay empty; unresolvable gids are logged and left
    /// empty as well so a bad reference never aborts a map load.
    pub fn from_data(
        data: &TileLayerData,
        tilesets: &[MapTileset],
    ) -> Result<Self, crate::error::TilemapError> {
        let expected = (data.width * data.height) as usize;
        if data.data.len() != expected {
            return Err(crate::error::TilemapError::LayerSizeMismatch {
                layer: data.name.clone(),
                got: data.data.len(),
                expected,
            });
        }

        // The editor only writes the attribute for hidden layers, hence the
        // inversion. Preserved as-is; downstream maps depend on it.
        let visible = !matches!(&data.visible, Some(s) if !s.is_empty());

        let mut tiles: Vec<Vec<Option<LocalTile>>> = Vec::with_capacity(data.height as usize);
        let mut batch_map: HashMap<TextureHandle, Vec<Vertex>> = HashMap::new();
        let mut animated = Vec::new();

        for y in 0..data.height {
            let mut row = Vec::with_capacity(data.width as usize);
            for x in 0..data.width {
                let raw = data.data[(x + y * data.width) as usize];
                if raw == 0 {
                    row.push(None);
                    continue;
                }
                let (flags, gid) = GidFlags::decode(raw);
                let resolved = tilesets
                    .iter()
                    .position(|ts| ts.contains(gid))
                    .map(|index| super::tileset::ResolvedTile {
                        tileset: index,
                        local_id: gid - tilesets[index].first_gid,
                        flags,
                    });
                let Some(resolved) = resolved else {
                    log::warn!(
                        "layer '{}': no tileset range contains gid {} at ({}, {}), leaving cell empty",
                        data.name, gid, x, y
                    );
                    row.push(None);
                    continue;
                };

                let tile = LocalTile::build(tilesets, resolved, gid, x, y);
                if tile.animated() {
                    animated.push((x, y));
                } else {
                    batch_map
                        .entry(tile.texture)
                        .or_default()
                        .extend_from_slice(tile.vertices());
                }
                row.push(Some(tile));
            }
            tiles.push(row);
        }

        let mut batches: Vec<(TextureHandle, Vec<Vertex>)> = batch_map.into_iter().collect();
        batches.sort_by_key(|(texture, _)| *texture);

        Ok(Self {
            id: data.id,
            name: data.name.clone(),
            width: data.width,
            height: data.height,
            visible,
            properties: decode_properties(&data.properties),
            tiles,
            batches,
            animated,
        })
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<&LocalTile> {
        self.tiles
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .and_then(|cell| cell.as_ref())
    }

    /// Ticks the animated tile at a cell, if any.
    pub fn update_tile(&mut self, x: u32, y: u32, dt: f32) {
        if let Some(row) = self.tiles.get_mut(y as usize) {
            if let Some(Some(tile)) = row.get_mut(x as usize) {
                if tile.animated() {
                    tile.update(dt);
                }
            }
        }
    }

    /// Cells currently holding animated tiles.
    pub fn animated_cells(&self) -> &[(u32, u32)] {
        &self.animated
    }
}

impl Drawable for TileLayer {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, _ctx: &FrameContext) {
        if !self.visible {
            log::debug!("skipping hidden tile layer '{}'", self.name);
            return;
        }
        for (texture, vertices) in &self.batches {
            let states = RenderStates {
                texture: Some(*texture),
                ..states
            };
            target.draw_vertices(vertices, states);
        }
        for &(x, y) in &self.animated {
            if let Some(tile) = self.tile(x, y) {
                let states = RenderStates {
                    texture: Some(tile.texture),
                    ..states
                };
                target.draw_vertices(tile.vertices(), states);
            }
        }
    }
}

/// A typed shape parsed from a map object.
#[derive(Clone, Debug, PartialEq)]
pub enum MapObject {
    Rect(Rect),
    Point(Vec2),
    Ellipse(Rect),
    Polyline { origin: Vec2, points: Vec<Vec2> },
    Polygon { origin: Vec2, points: Vec<Vec2> },
}

/// A collection of typed shapes, used for collision boxes and spawn points.
#[derive(Debug)]
pub struct ObjectGroup {
    pub id: u32,
    pub name: String,
    pub color: Color,
    pub objects: Vec<MapObject>,
}

impl ObjectGroup {
    pub fn from_data(data: &ObjectGroupData) -> Self {
        let color = data
            .color
            .as_deref()
            .and_then(|hex| Color::from_hex_rgb(hex, 155))
            .unwrap_or(Color::rgba(100, 100, 100, 155));

        let objects = data
            .objects
            .iter()
            .map(|obj| {
                let pos = Vec2::new(obj.x, obj.y);
                let size = Vec2::new(obj.width.unwrap_or(0.0), obj.height.unwrap_or(0.0));
                if obj.point {
                    MapObject::Point(pos)
                } else if obj.ellipse {
                    MapObject::Ellipse(Rect::new(pos, size))
                } else if let Some(points) = &obj.polygon {
                    MapObject::Polygon {
                        origin: pos,
                        points: points.iter().map(|p| Vec2::new(p.x, p.y)).collect(),
                    }
                } else if let Some(points) = &obj.polyline {
                    MapObject::Polyline {
                        origin: pos,
                        points: points.iter().map(|p| Vec2::new(p.x, p.y)).collect(),
                    }
                } else {
                    MapObject::Rect(Rect::new(pos, size))
                }
            })
            .collect();

        Self {
            id: data.id,
            name: data.name.clone(),
            color,
            objects,
        }
    }

    /// The rectangle shapes of the group, the ones collision designation uses.
    pub fn rects(&self) -> Vec<Rect> {
        self.objects
            .iter()
            .filter_map(|obj| match obj {
                MapObject::Rect(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Drawable for ObjectGroup {
    /// Debug visualization: rectangles as translucent quads in the group
    /// color.
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, _ctx: &FrameContext) {
        for obj in &self.objects {
            if let MapObject::Rect(rect) = obj {
                target.draw_vertices(&crate::render::quad(*rect, self.color), states);
            }
        }
    }
}
