use crate::math::{Rect, Vec2};

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a `#rrggbb` string, attaching the given alpha.
    pub fn from_hex_rgb(hex: &str, alpha: u8) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() < 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgba(r, g, b, alpha))
    }

    /// Parses a `#rrggbbaa` string.
    pub fn from_hex_rgba(hex: &str) -> Option<Self> {
        let stripped = hex.strip_prefix('#')?;
        if stripped.len() < 8 {
            return None;
        }
        let a = u8::from_str_radix(&stripped[6..8], 16).ok()?;
        Self::from_hex_rgb(hex, a)
    }
}

/// Opaque handle to a texture owned by the external rasterizer.
///
/// The engine core never touches pixel data; it only tags draw calls with the
/// handle so the rasterizer can bind the right atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// A single vertex of a textured quad.
///
/// Texture coordinates are in texture pixels, not normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub tex_coords: Vec2,
    pub color: Color,
}

impl Vertex {
    pub fn new(position: Vec2, tex_coords: Vec2) -> Self {
        Self {
            position,
            tex_coords,
            color: Color::WHITE,
        }
    }

    pub fn colored(position: Vec2, color: Color) -> Self {
        Self {
            position,
            tex_coords: Vec2::ZERO,
            color,
        }
    }
}

/// Builds the four vertices of an axis-aligned colored quad.
pub fn quad(rect: Rect, color: Color) -> [Vertex; 4] {
    [
        Vertex::colored(rect.top_left(), color),
        Vertex::colored(rect.top_right(), color),
        Vertex::colored(rect.bottom_right(), color),
        Vertex::colored(rect.bottom_left(), color),
    ]
}

/// A textured quad positioned in world space.
///
/// `ratio` mirrors the sprite around its origin when negative, which is how
/// entities face left or right without a second set of frames.
#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub texture: TextureHandle,
    /// Source rectangle in texture pixels.
    pub texture_rect: Rect,
    /// Local pivot subtracted from the position before scaling.
    pub origin: Vec2,
    pub position: Vec2,
    pub ratio: Vec2,
    pub color: Color,
}

impl Sprite {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            texture_rect: Rect::default(),
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
            ratio: Vec2::ONE,
            color: Color::WHITE,
        }
    }

    fn corner(&self, local: Vec2) -> Vec2 {
        Vec2::new(
            self.position.x + (local.x - self.origin.x) * self.ratio.x,
            self.position.y + (local.y - self.origin.y) * self.ratio.y,
        )
    }

    /// The four world-space vertices of the sprite quad.
    pub fn vertices(&self) -> [Vertex; 4] {
        let size = self.texture_rect.size();
        let locals = [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ];
        let tex = [
            self.texture_rect.top_left(),
            self.texture_rect.top_right(),
            self.texture_rect.bottom_right(),
            self.texture_rect.bottom_left(),
        ];
        let mut out = [Vertex::new(Vec2::ZERO, Vec2::ZERO); 4];
        for i in 0..4 {
            out[i] = Vertex {
                position: self.corner(locals[i]),
                tex_coords: tex[i],
                color: self.color,
            };
        }
        out
    }

    /// Axis-aligned bounds of the (possibly mirrored) sprite quad.
    pub fn global_bounds(&self) -> Rect {
        let verts = self.vertices();
        let mut min = verts[0].position;
        let mut max = verts[0].position;
        for v in &verts[1..] {
            min = min.min(v.position);
            max = max.max(v.position);
        }
        Rect::new(min, max - min)
    }
}
