mod animation;
mod sprite;
mod target;

pub use animation::{Animation, AnimationFrame, AnimationPlayer, SpriteSheet};
pub use sprite::{quad, Color, Sprite, TextureHandle, Vertex};
pub use target::{BlendMode, DrawCommand, Drawable, RenderStates, RenderTarget, Surface};
