//! Kiln2D - a lightweight 2D scene compositing and tile-collision engine core.
//!
//! The core covers scenes composed of ordered layers and masks, cameras with
//! follow/shake behavior, tile-map loading with animated and transformed
//! tiles, sprite animation, and platformer entity physics. Windowing, asset
//! I/O and the actual rasterizer stay external: the engine records draw
//! commands against an abstract [`RenderTarget`].

pub mod camera;
pub mod context;
pub mod entity;
pub mod error;
pub mod input;
pub mod layer;
pub mod math;
pub mod physics;
pub mod render;
pub mod scene;
pub mod stage;
pub mod tilemap;
pub mod world;

pub use crate::camera::{Camera, CameraState};
pub use crate::context::{FrameContext, UpdateContext};
pub use crate::entity::Entity;
pub use crate::error::TilemapError;
pub use crate::input::InputState;
pub use crate::layer::{DrawRef, Layer, Mask};
pub use crate::math::{Rect, Vec2};
pub use crate::physics::{Controls, PlatformerEntity};
pub use crate::render::{
    Animation, AnimationFrame, AnimationPlayer, BlendMode, Color, DrawCommand, Drawable,
    RenderStates, RenderTarget, Sprite, SpriteSheet, Surface, TextureHandle, Vertex,
};
pub use crate::scene::Scene;
pub use crate::stage::{CameraId, SceneId, Stage};
pub use crate::tilemap::{GidFlags, MapTileset, TileLayer, TiledMap, Tileset};
pub use crate::world::{DrawableId, DrawableStore};
pub use winit::keyboard::KeyCode;
