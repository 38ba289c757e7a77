use std::collections::HashMap;
use std::sync::Arc;

use crate::math::{Rect, Vec2};

use super::sprite::TextureHandle;

/// A single frame of a sprite animation.
#[derive(Clone, Copy, Debug)]
pub struct AnimationFrame {
    /// Source rectangle in the sheet texture, in pixels.
    pub rect: Rect,
    /// How long this frame lasts, in milliseconds.
    pub duration_ms: u32,
    /// Pivot applied to the sprite while this frame is active.
    pub origin: Vec2,
}

impl AnimationFrame {
    pub fn new(rect: Rect, duration_ms: u32) -> Self {
        Self {
            rect,
            duration_ms,
            origin: Vec2::ZERO,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<Vec2>) -> Self {
        self.origin = origin.into();
        self
    }
}

/// An ordered frame sequence.
#[derive(Clone, Debug)]
pub struct Animation {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

impl Animation {
    pub fn new(frames: Vec<AnimationFrame>, looping: bool) -> Self {
        Self { frames, looping }
    }
}

/// A named set of animations sharing one texture, typically defined once per
/// character and shared between entity instances.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    pub name: String,
    pub texture: TextureHandle,
    pub anims: HashMap<String, Animation>,
}

impl SpriteSheet {
    pub fn new(
        name: impl Into<String>,
        texture: TextureHandle,
        anims: HashMap<String, Animation>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            texture,
            anims,
        })
    }
}

/// Playback state for one animation at a time.
///
/// The player does not own animation data; callers pass the active
/// [`Animation`] into [`update`](Self::update) so sheets stay shared.
#[derive(Clone, Debug)]
pub struct AnimationPlayer {
    current: String,
    frame_index: usize,
    playing: bool,
    clock_ms: f32,
}

impl AnimationPlayer {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
            frame_index: 0,
            playing: true,
            clock_ms: 0.0,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Switches to another animation. Requesting the animation that is
    /// already active is a no-op: the playback position is preserved, so
    /// holding a movement key does not restart the walk cycle every frame.
    pub fn play(&mut self, name: &str) {
        if self.current == name {
            return;
        }
        self.current = name.to_string();
        self.frame_index = 0;
        self.clock_ms = 0.0;
        self.playing = true;
    }

    /// Advances the clock by `dt` seconds against the active animation.
    pub fn update(&mut self, dt: f32, anim: &Animation) {
        if !self.playing || anim.frames.is_empty() {
            return;
        }
        self.clock_ms += dt * 1000.0;
        let duration = anim.frames[self.frame_index.min(anim.frames.len() - 1)].duration_ms as f32;
        if self.clock_ms >= duration {
            self.clock_ms -= duration;
            self.frame_index += 1;
            if self.frame_index >= anim.frames.len() {
                if anim.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = anim.frames.len() - 1;
                    self.playing = false;
                }
            }
        }
    }

    /// The active frame of the given animation.
    pub fn frame<'a>(&self, anim: &'a Animation) -> &'a AnimationFrame {
        &anim.frames[self.frame_index.min(anim.frames.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_frames(looping: bool) -> Animation {
        let frame = AnimationFrame::new(Rect::new((0.0, 0.0), (16.0, 16.0)), 100);
        Animation::new(vec![frame; 3], looping)
    }

    #[test]
    fn looping_animation_wraps_to_first_frame() {
        let anim = three_frames(true);
        let mut player = AnimationPlayer::new("walk");
        for _ in 0..3 {
            player.update(0.1, &anim);
        }
        assert_eq!(player.frame_index(), 0);
        assert!(player.playing());
    }

    #[test]
    fn non_looping_animation_freezes_on_last_frame() {
        let anim = three_frames(false);
        let mut player = AnimationPlayer::new("land");
        for _ in 0..5 {
            player.update(0.1, &anim);
        }
        assert_eq!(player.frame_index(), 2);
        assert!(!player.playing());
    }

    #[test]
    fn replaying_active_animation_keeps_position() {
        let anim = three_frames(true);
        let mut player = AnimationPlayer::new("walk");
        player.update(0.1, &anim);
        assert_eq!(player.frame_index(), 1);

        player.play("walk");
        assert_eq!(player.frame_index(), 1);

        player.play("idle");
        assert_eq!(player.frame_index(), 0);
    }
}
