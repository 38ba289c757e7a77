//! Platformer movement and tile collision resolution.
//!
//! Integration is two-phase and axis-separated: the horizontal remainder is
//! accumulated and checked against walls, normalized across cell boundaries,
//! then the vertical remainder goes through the same cycle against ceilings
//! and floors. The `0.3` / `0.7` / `0.99` remainder thresholds are tuned
//! snap-tolerances that keep entities from jittering at cell boundaries.

use std::sync::Arc;

use winit::keyboard::KeyCode;

use crate::context::{FrameContext, UpdateContext};
use crate::entity::Entity;
use crate::input::InputState;
use crate::math::{Rect, Vec2};
use crate::render::{Drawable, RenderStates, RenderTarget, SpriteSheet};

/// Key bindings for a platformer entity.
#[derive(Clone, Copy, Debug)]
pub struct Controls {
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
        }
    }
}

/// An [`Entity`] with gravity, jumping and per-axis swept collision against
/// the map's static collision rectangles.
pub struct PlatformerEntity {
    pub entity: Entity,
    pub controls: Controls,
    pub velocity: Vec2,
    pub jump_velocity: Vec2,
    pub gravity: Vec2,
    pub onground: bool,
    pub jumping: bool,
    pub falling: bool,
    /// Total jumps between landings; 2 enables a double jump.
    pub jump_count: u32,
    pub remaining_jumps: u32,
}

impl PlatformerEntity {
    pub fn new(name: impl Into<String>, sheet: Arc<SpriteSheet>) -> Self {
        Self {
            entity: Entity::new(name, sheet, 16.0),
            controls: Controls::default(),
            velocity: Vec2::ZERO,
            jump_velocity: Vec2::new(0.0, -18.0),
            gravity: Vec2::new(0.0, 1.0),
            onground: false,
            jumping: false,
            falling: true,
            jump_count: 2,
            remaining_jumps: 2,
        }
    }

    /// Attempts a jump.
    ///
    /// Every jump spends one of `remaining_jumps`; air jumps are allowed
    /// until they run out, and the counter never goes below zero. A grounded
    /// jump is additionally refused when a collision rectangle sits in the
    /// cell directly above the entity's head.
    pub fn jump(&mut self, collisions: &[Rect]) {
        if self.remaining_jumps == 0 {
            return;
        }
        if self.onground {
            let bbox = self.entity.collision_box();
            let x = self.entity.x();
            let g = self.entity.gridsize;
            let over = collisions
                .iter()
                .filter(|b| b.bottom() < bbox.top && b.left <= x && x <= b.right())
                .min_by(|a, b| {
                    (a.bottom() - bbox.top)
                        .abs()
                        .total_cmp(&(b.bottom() - bbox.top).abs())
                });
            if let Some(nearest) = over {
                if (bbox.top / g).floor() == (nearest.bottom() / g).floor() {
                    return;
                }
            }
        }
        self.jumping = true;
        self.onground = false;
        self.velocity.y = self.jump_velocity.y;
        self.remaining_jumps -= 1;
    }

    /// Ground contact: clears the airborne state and refills the jumps.
    pub fn land(&mut self) {
        if !self.onground {
            self.jumping = false;
            self.onground = true;
            self.falling = false;
            self.remaining_jumps = self.jump_count;
        }
    }

    /// No movement input: horizontal friction on the ground, a fixed decay in
    /// the air, and a small deadzone snapping the velocity to exactly zero.
    pub fn idle(&mut self) {
        if -0.05 < self.velocity.x && self.velocity.x < 0.05 {
            self.velocity.x = 0.0;
        } else if self.onground {
            self.velocity.x *= 0.80;
        } else if self.velocity.x < 0.0 {
            self.velocity.x += 0.3;
        } else {
            self.velocity.x -= 0.3;
        }
        self.entity.set_anim_state("idle");
    }

    pub fn walk_right(&mut self) {
        self.velocity.x = (self.velocity.x + 0.5).min(12.0);
        self.entity.direction.x = 1.0;
        self.entity.set_anim_state("walk");
    }

    pub fn walk_left(&mut self) {
        self.velocity.x = (self.velocity.x - 0.5).max(-12.0);
        self.entity.direction.x = -1.0;
        self.entity.set_anim_state("walk");
    }

    fn handle_controls(&mut self, inputs: &InputState, ctx: &UpdateContext) {
        if inputs.is_key_pressed(self.controls.up)
            && self.remaining_jumps > 0
            && !self.falling
        {
            self.jump(ctx.collisions);
        }

        // First held key that maps to a control wins; the jump key does not
        // count as movement input.
        let mut handled = false;
        let mut any_movement_key = false;
        for key in inputs.ordered_pressed() {
            if *key == self.controls.up {
                continue;
            }
            any_movement_key = true;
            if *key == self.controls.down && self.onground {
                self.idle();
                handled = true;
            } else if *key == self.controls.right {
                self.walk_right();
                handled = true;
            } else if *key == self.controls.left {
                self.walk_left();
                handled = true;
            }
            if handled {
                break;
            }
        }
        if !any_movement_key {
            self.idle();
        }
    }

    /// Per-frame integration against the frame's collision snapshot.
    pub fn update(&mut self, dt: f32, inputs: &InputState, ctx: &UpdateContext) {
        self.handle_controls(inputs, ctx);

        if !self.onground {
            self.velocity += self.gravity;
        }
        self.falling = self.velocity.y > 0.0 && !self.onground;

        let g = self.entity.gridsize;
        // Bounding box from the last base update; both phases read the same
        // snapshot.
        let bbox = self.entity.collision_box();

        // Horizontal phase.
        self.entity.rx += self.velocity.x * dt;
        for rect in ctx.collisions {
            let vertically_overlapping = (rect.top <= bbox.top && bbox.top < rect.bottom())
                || (rect.top < bbox.bottom() && bbox.bottom() <= rect.bottom())
                || (bbox.top <= rect.top && rect.top < bbox.bottom())
                || (bbox.top < rect.bottom() && rect.bottom() <= bbox.bottom());
            if !vertically_overlapping {
                continue;
            }
            // Blocked against a wall unless already past the snap threshold
            // into the next cell.
            if self.velocity.x < 0.0
                && (bbox.left / g).floor() == ((rect.right() - 1.0) / g).floor()
                && self.entity.rx < 0.3
            {
                self.entity.rx -= self.velocity.x * dt;
                self.velocity.x = 0.0;
            }
            if self.velocity.x > 0.0
                && (bbox.right() / g).floor() == (rect.left / g).floor()
                && self.entity.rx > 0.7
            {
                self.entity.rx -= self.velocity.x * dt;
                self.velocity.x = 0.0;
            }
        }
        while self.entity.rx > 1.0 {
            self.entity.rx -= 1.0;
            self.entity.gx += 1;
        }
        while self.entity.rx < 0.0 {
            self.entity.rx += 1.0;
            self.entity.gx -= 1;
        }

        // Vertical phase.
        self.entity.ry += self.velocity.y * dt;
        let mut bottom_contact = false;
        for rect in ctx.collisions {
            let gx = self.entity.gx as f32;
            if !(rect.left / g <= gx && gx < rect.right() / g) {
                continue;
            }
            // Ceiling: snap below the rect and start falling.
            if self.velocity.y < 0.0
                && (bbox.top / g).floor() == ((rect.bottom() - 1.0) / g).floor()
                && self.entity.ry < 0.99
            {
                let origin_y = self.entity.sprite.origin.y;
                self.entity.set_y(rect.bottom() + origin_y);
                self.falling = true;
                self.velocity.y = 0.0;
            }
            // Floor: clamp the remainder on the contact row and land.
            if (self.entity.gy + 1) as f32 == rect.top / g && self.entity.ry >= 0.99 {
                self.entity.ry = 0.99;
                self.velocity.y = 0.0;
                self.land();
                bottom_contact = true;
                break;
            }
        }
        if !bottom_contact {
            self.onground = false;
        }
        while self.entity.ry > 1.0 {
            self.entity.ry -= 1.0;
            self.entity.gy += 1;
        }
        while self.entity.ry < 0.0 {
            self.entity.ry += 1.0;
            self.entity.gy -= 1;
        }

        self.entity.update(dt);
    }
}

impl Drawable for PlatformerEntity {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, ctx: &FrameContext) {
        self.entity.draw(target, states, ctx);
    }

    fn position(&self) -> Vec2 {
        self.entity.position()
    }
}
