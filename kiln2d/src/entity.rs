use std::sync::Arc;

use crate::context::FrameContext;
use crate::math::{Rect, Vec2};
use crate::render::{
    quad, AnimationPlayer, Color, Drawable, RenderStates, RenderTarget, Sprite, SpriteSheet,
};

/// Base entity: an animated sprite positioned on a collision grid.
///
/// The position is kept as an integer grid cell plus a fractional in-cell
/// remainder in `[0, 1)`. Collision resolution works on cell boundaries and
/// needs the remainder isolated to notice a cell edge being crossed within a
/// single frame, independent of accumulated float error.
pub struct Entity {
    pub name: String,
    pub sprite: Sprite,
    /// Mirroring applied to the sprite; `x = -1` faces left.
    pub direction: Vec2,
    pub gridsize: f32,
    /// Grid cell.
    pub gx: i32,
    pub gy: i32,
    /// In-cell remainder, `[0, 1)` after normalization.
    pub rx: f32,
    pub ry: f32,
    sheet: Arc<SpriteSheet>,
    anim_state: String,
    player: AnimationPlayer,
    collision_box: Rect,
}

impl Entity {
    /// Creates an entity from a sprite sheet. The sheet must define an
    /// `"idle"` animation, the initial state.
    pub fn new(name: impl Into<String>, sheet: Arc<SpriteSheet>, gridsize: f32) -> Self {
        let name = name.into();
        let anim_state = "idle".to_string();
        let anim = sheet
            .anims
            .get(&anim_state)
            .unwrap_or_else(|| panic!("entity '{}' has no animation state named 'idle'", name));
        let first = anim.frames[0];

        let mut sprite = Sprite::new(sheet.texture);
        sprite.texture_rect = first.rect;
        sprite.origin = first.origin;

        let mut entity = Self {
            name,
            sprite,
            direction: Vec2::ONE,
            gridsize,
            gx: 0,
            gy: 0,
            rx: 0.0,
            ry: 0.0,
            sheet,
            anim_state,
            player: AnimationPlayer::new("idle"),
            collision_box: Rect::default(),
        };
        entity.collision_box = entity.global_bounds();
        entity
    }

    pub fn anim_state(&self) -> &str {
        &self.anim_state
    }

    /// Switches the animation state machine.
    ///
    /// Re-requesting the active state is a no-op. Requesting a state the
    /// sheet does not define is a wiring error in game logic and panics
    /// immediately rather than silently doing nothing.
    pub fn set_anim_state(&mut self, value: &str) {
        if self.anim_state == value {
            return;
        }
        let anim = self.sheet.anims.get(value).unwrap_or_else(|| {
            panic!(
                "entity '{}' has no animation state named '{}'",
                self.name, value
            )
        });
        self.anim_state = value.to_string();
        self.player.play(value);
        let frame = self.player.frame(anim);
        self.sprite.texture_rect = frame.rect;
        self.sprite.origin = frame.origin;
    }

    /// Pixel X position, recomposed from cell and remainder.
    pub fn x(&self) -> f32 {
        (self.gx as f32 + self.rx) * self.gridsize
    }

    pub fn set_x(&mut self, value: f32) {
        self.gx = (value / self.gridsize).floor() as i32;
        self.rx = (value - self.gx as f32 * self.gridsize) / self.gridsize;
    }

    /// Pixel Y position, recomposed from cell and remainder.
    pub fn y(&self) -> f32 {
        (self.gy as f32 + self.ry) * self.gridsize
    }

    pub fn set_y(&mut self, value: f32) {
        self.gy = (value / self.gridsize).floor() as i32;
        self.ry = (value - self.gy as f32 * self.gridsize) / self.gridsize;
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x(), self.y())
    }

    pub fn set_position(&mut self, value: impl Into<Vec2>) {
        let value = value.into();
        self.set_x(value.x);
        self.set_y(value.y);
    }

    /// Bounding box as of the last update.
    pub fn collision_box(&self) -> Rect {
        self.collision_box
    }

    pub fn global_bounds(&self) -> Rect {
        self.sprite.global_bounds()
    }

    /// Syncs the sprite to the (pixel-rounded) position, refreshes the
    /// bounding box and ticks the animation.
    pub fn update(&mut self, dt: f32) {
        self.sprite.position = Vec2::new(self.x().round(), self.y().round());
        self.sprite.ratio = self.direction;
        self.collision_box = self.global_bounds();
        self.update_anim(dt);
    }

    fn update_anim(&mut self, dt: f32) {
        let anim = self
            .sheet
            .anims
            .get(self.player.current())
            .unwrap_or_else(|| {
                panic!(
                    "entity '{}' has no animation state named '{}'",
                    self.name,
                    self.player.current()
                )
            });
        self.player.update(dt, anim);
        let frame = self.player.frame(anim);
        if self.sprite.texture_rect != frame.rect {
            self.sprite.texture_rect = frame.rect;
            self.sprite.origin = frame.origin;
        }
    }
}

impl Drawable for Entity {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, ctx: &FrameContext) {
        target.draw_vertices(&self.sprite.vertices(), RenderStates {
            texture: Some(self.sprite.texture),
            ..states
        });
        if ctx.debug {
            target.draw_vertices(
                &quad(self.collision_box, Color::rgba(200, 0, 0, 150)),
                states,
            );
        }
    }

    fn position(&self) -> Vec2 {
        Entity::position(self)
    }
}
