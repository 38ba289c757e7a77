//! Per-frame context objects.
//!
//! The engine deliberately has no globally reachable game singleton; whatever
//! a component needs each frame is passed in explicitly. Entity updates see
//! the collision snapshot, composition sees the drawable store and the map.

use crate::math::{Rect, Vec2};
use crate::tilemap::TiledMap;
use crate::world::DrawableStore;

/// Context for the compose phase: scene rendering, layer resolution and
/// camera following all read through this.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub store: &'a DrawableStore,
    pub map: Option<&'a TiledMap>,
    pub debug: bool,
}

impl<'a> FrameContext<'a> {
    pub fn new(store: &'a DrawableStore) -> Self {
        Self {
            store,
            map: None,
            debug: false,
        }
    }

    pub fn with_map(mut self, map: &'a TiledMap) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Context for the update phase. The collision slice is a snapshot of static
/// map geometry: every entity updated this frame observes the same rectangles.
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    pub collisions: &'a [Rect],
    pub map_pixel_size: Vec2,
    pub debug: bool,
}

impl<'a> UpdateContext<'a> {
    /// A context with no collision geometry; entities treat the world as
    /// collision-free.
    pub fn empty() -> Self {
        Self {
            collisions: &[],
            map_pixel_size: Vec2::ZERO,
            debug: false,
        }
    }

    pub fn from_map(map: &'a TiledMap) -> Self {
        Self {
            collisions: map.collisions(),
            map_pixel_size: map.pixel_size(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
