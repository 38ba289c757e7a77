use std::any::Any;

use glam::Mat4;

use crate::context::FrameContext;
use crate::math::Vec2;

use super::sprite::{Color, TextureHandle, Vertex};

/// How incoming fragments combine with what is already on the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,
    /// Overwrite the destination, alpha included. Masks rely on this so their
    /// fill color shows through wherever no drawable covered it.
    Replace,
}

/// State accompanying a draw call down to the rasterizer.
#[derive(Clone, Copy, Debug)]
pub struct RenderStates {
    pub blend: BlendMode,
    pub texture: Option<TextureHandle>,
    pub transform: Mat4,
}

impl Default for RenderStates {
    fn default() -> Self {
        Self {
            blend: BlendMode::Alpha,
            texture: None,
            transform: Mat4::IDENTITY,
        }
    }
}

impl RenderStates {
    pub fn with_blend(blend: BlendMode) -> Self {
        Self {
            blend,
            ..Self::default()
        }
    }

    pub fn with_texture(texture: TextureHandle) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }
}

/// Abstract rasterizer boundary.
///
/// The engine core only ever issues these three operations; a real GPU or
/// software renderer implements them externally. [`Surface`] implements the
/// trait by recording, which is what scenes and masks compose onto.
pub trait RenderTarget {
    fn clear(&mut self, color: Color);
    fn draw_vertices(&mut self, vertices: &[Vertex], states: RenderStates);
    fn draw_surface(&mut self, surface: &Surface, states: RenderStates);
}

/// Anything a [`crate::layer::Layer`] or [`crate::layer::Mask`] can display.
///
/// Drawables live in the [`crate::world::DrawableStore`]; layers reference
/// them through non-owning handles. `ended` lets transient elements (expired
/// effects) request their own removal during the next layer update.
pub trait Drawable: Any {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, ctx: &FrameContext);

    /// World position, used for Y-sorting and camera following.
    fn position(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Transient drawables return true once they should be pruned.
    fn ended(&self) -> bool {
        false
    }
}

/// One recorded operation on a [`Surface`].
#[derive(Clone, Debug)]
pub enum DrawCommand {
    Clear(Color),
    Vertices {
        vertices: Vec<Vertex>,
        states: RenderStates,
    },
    /// Another surface composited as a single unit.
    Blit {
        width: u32,
        height: u32,
        commands: Vec<DrawCommand>,
        states: RenderStates,
    },
}

/// An offscreen composition target.
///
/// Recording rather than rasterizing keeps the core renderer-agnostic: each
/// frame ends as an ordered command list handed to the external rasterizer,
/// and the list is directly inspectable in tests.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl RenderTarget for Surface {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_vertices(&mut self, vertices: &[Vertex], states: RenderStates) {
        self.commands.push(DrawCommand::Vertices {
            vertices: vertices.to_vec(),
            states,
        });
    }

    fn draw_surface(&mut self, surface: &Surface, states: RenderStates) {
        self.commands.push(DrawCommand::Blit {
            width: surface.width,
            height: surface.height,
            commands: surface.commands.clone(),
            states,
        });
    }
}
