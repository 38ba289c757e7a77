use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::camera::Camera;
use crate::error::TilemapError;
use crate::math::{Rect, Vec2};

use super::data::MapData;
use super::layer::{ObjectGroup, TileLayer};
use super::tileset::{GidFlags, MapTileset, ResolvedTile, Tileset};

/// A fully parsed map: tilesets bound into the global-ID space, tile layers,
/// object groups and the designated collision rectangles.
#[derive(Debug)]
pub struct TiledMap {
    pub name: String,
    size: (u32, u32),
    tile_size: (u32, u32),
    pub tilesets: Vec<MapTileset>,
    layers: Vec<TileLayer>,
    objectgroups: Vec<ObjectGroup>,
    collisions: Vec<Rect>,
}

impl TiledMap {
    /// Parses a map document. Referenced tilesets are looked up by their
    /// `source` name in `tilesets`; the caller owns loading those documents
    /// and their textures.
    pub fn from_json(
        name: impl Into<String>,
        json: &str,
        tilesets: &HashMap<String, Arc<Tileset>>,
    ) -> Result<Self, TilemapError> {
        let data: MapData = serde_json::from_str(json)?;
        Self::from_data(name, data, tilesets)
    }

    pub fn from_data(
        name: impl Into<String>,
        data: MapData,
        tilesets: &HashMap<String, Arc<Tileset>>,
    ) -> Result<Self, TilemapError> {
        let name = name.into();

        let mut map_tilesets = Vec::with_capacity(data.tilesets.len());
        for tsref in &data.tilesets {
            let tileset = tilesets
                .get(&tsref.source)
                .ok_or_else(|| TilemapError::MissingTileset(tsref.source.clone()))?;
            map_tilesets.push(MapTileset::new(Arc::clone(tileset), tsref.firstgid));
        }

        let mut layers = Vec::new();
        let mut objectgroups = Vec::new();
        for layer in &data.layers {
            match layer {
                super::data::LayerData::Tiles(tile_data) => {
                    layers.push(TileLayer::from_data(tile_data, &map_tilesets)?);
                }
                super::data::LayerData::Objects(group_data) => {
                    objectgroups.push(ObjectGroup::from_data(group_data));
                }
            }
        }

        Ok(Self {
            name,
            size: (data.width, data.height),
            tile_size: (data.tilewidth, data.tileheight),
            tilesets: map_tilesets,
            layers,
            objectgroups,
            collisions: Vec::new(),
        })
    }

    /// Resolves a raw GID to its owning tileset, local id and transform
    /// flags. A gid no tileset range covers is an error the caller should
    /// treat as "render nothing".
    pub fn resolve(&self, raw_gid: u32) -> Result<ResolvedTile, TilemapError> {
        let (flags, gid) = GidFlags::decode(raw_gid);
        self.tilesets
            .iter()
            .position(|ts| ts.contains(gid))
            .map(|index| ResolvedTile {
                tileset: index,
                local_id: gid - self.tilesets[index].first_gid,
                flags,
            })
            .ok_or(TilemapError::UnresolvedGid(gid))
    }

    /// Designates a named object group as the authoritative collision source.
    ///
    /// Until this is called the collision list is empty and entities treat
    /// the map as collision-free. A missing group is a map/code mismatch and
    /// fails fast.
    pub fn set_collisions_source(&mut self, group: &str) -> Result<(), TilemapError> {
        match self.objectgroup(group) {
            Some(g) => {
                self.collisions = g.rects();
                Ok(())
            }
            None => Err(TilemapError::MissingObjectGroup {
                group: group.to_string(),
                map: self.name.clone(),
            }),
        }
    }

    pub fn collisions(&self) -> &[Rect] {
        &self.collisions
    }

    /// Ticks animated tiles, bounded to the cells any camera can see.
    ///
    /// Each camera contributes a padded tile-index window over its view rect;
    /// only the union is updated, so animation cost tracks the visible area
    /// rather than the map size.
    pub fn update(&mut self, dt: f32, cameras: &[Camera]) {
        let tile_w = self.tile_size.0 as f32;
        let tile_h = self.tile_size.1 as f32;
        let (map_w, map_h) = self.size;

        let mut xcells: BTreeSet<u32> = BTreeSet::new();
        let mut ycells: BTreeSet<u32> = BTreeSet::new();
        for cam in cameras {
            let bounds = cam.bounds();
            let xmin = ((bounds.left / tile_w) as i64 - 2).max(0) as u32;
            let xmax = (((bounds.right() / tile_w) as i64) + 2).min(map_w as i64) as u32;
            let ymin = ((bounds.top / tile_h) as i64 - 2).max(0) as u32;
            let ymax = (((bounds.bottom() / tile_h) as i64) + 2).min(map_h as i64) as u32;
            xcells.extend(xmin..xmax.max(xmin));
            ycells.extend(ymin..ymax.max(ymin));
        }

        for layer in &mut self.layers {
            if !layer.visible {
                continue;
            }
            for &y in &ycells {
                for &x in &xcells {
                    layer.update_tile(x, y, dt);
                }
            }
        }
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut TileLayer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    pub fn layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter()
    }

    pub fn objectgroup(&self, name: &str) -> Option<&ObjectGroup> {
        self.objectgroups.iter().find(|g| g.name == name)
    }

    pub fn objectgroups(&self) -> impl Iterator<Item = &ObjectGroup> {
        self.objectgroups.iter()
    }

    /// Map size in tiles.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    /// Tile size in pixels.
    pub fn tile_size(&self) -> (u32, u32) {
        self.tile_size
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_size.0
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_size.1
    }

    /// Map size in pixels, the clamp bound for camera following.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.size.0 * self.tile_size.0) as f32,
            (self.size.1 * self.tile_size.1) as f32,
        )
    }
}
