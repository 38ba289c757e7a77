use glam::{Mat4, Vec3};

use crate::context::FrameContext;
use crate::math::{Rect, Vec2};
use crate::render::Drawable;
use crate::stage::SceneId;
use crate::world::DrawableId;

/// Camera shake state machine. A camera is either idle (zero offset) or
/// quaking with a decaying random offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraState {
    Idle,
    Quake {
        duration: f32,
        amplitude: f32,
        /// Per-axis enable: 1.0 or 0.0 per component.
        direction: Vec2,
        elapsed: f32,
    },
}

impl CameraState {
    fn tick(&mut self, dt: f32) {
        if let Self::Quake { elapsed, .. } = self {
            *elapsed += dt;
        }
    }

    /// The current shake offset. Each query draws an independent random
    /// offset per enabled axis, scaled by the remaining-time ratio.
    fn offset(&self) -> Vec2 {
        match self {
            Self::Idle => Vec2::ZERO,
            Self::Quake {
                duration,
                amplitude,
                direction,
                elapsed,
            } => {
                let ratio = 1.0 - elapsed / duration;
                let off_x = (fastrand::f32() * 2.0 - 1.0) * amplitude;
                let off_y = (fastrand::f32() * 2.0 - 1.0) * amplitude;
                Vec2::new(off_x * direction.x * ratio, off_y * direction.y * ratio)
            }
        }
    }

    fn expired(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::Quake {
                duration, elapsed, ..
            } => elapsed >= duration,
        }
    }
}

/// A view rectangle in world pixels mapped onto a normalized window viewport.
///
/// A camera owns no drawables; it references a scene to display and
/// optionally a drawable to follow.
pub struct Camera {
    pub name: String,
    pub render_order: i32,
    pub visible: bool,
    /// Frames of smoothing when following a target; 0 snaps instantly
    /// (minimap style).
    pub frames_delay: u32,
    center: Vec2,
    size: Vec2,
    base_pos: Vec2,
    base_size: Vec2,
    viewport: Rect,
    vp_base_pos: Vec2,
    vp_base_size: Vec2,
    follow: Option<DrawableId>,
    state: CameraState,
    offset: Vec2,
    scene: Option<SceneId>,
}

impl Camera {
    pub fn new(name: impl Into<String>, render_order: i32) -> Self {
        Self {
            name: name.into(),
            render_order,
            visible: true,
            frames_delay: 15,
            center: Vec2::ZERO,
            size: Vec2::ZERO,
            base_pos: Vec2::ZERO,
            base_size: Vec2::ZERO,
            viewport: Rect::new((0.0, 0.0), (1.0, 1.0)),
            vp_base_pos: Vec2::ZERO,
            vp_base_size: Vec2::ONE,
            follow: None,
            state: CameraState::Idle,
            offset: Vec2::ZERO,
            scene: None,
        }
    }

    /// Resets the view rectangle (world pixels).
    pub fn reset(&mut self, position: impl Into<Vec2>, size: impl Into<Vec2>) {
        let position = position.into();
        let size = size.into();
        self.center = position + size / 2.0;
        self.size = size;
        self.base_pos = position;
        self.base_size = size;
    }

    /// Resets the normalized viewport and its base used by view rescaling.
    pub fn reset_viewport(&mut self, position: impl Into<Vec2>, size: impl Into<Vec2>) {
        let position = position.into();
        let size = size.into();
        self.viewport = Rect::new(position, size);
        self.vp_base_pos = position;
        self.vp_base_size = size;
    }

    pub fn set_scene(&mut self, scene: SceneId) {
        self.scene = Some(scene);
    }

    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub(crate) fn viewport_base(&self) -> (Vec2, Vec2) {
        (self.vp_base_pos, self.vp_base_size)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    pub fn set_left(&mut self, value: f32) {
        self.center.x = value + self.size.x / 2.0;
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    pub fn set_top(&mut self, value: f32) {
        self.center.y = value + self.size.y / 2.0;
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    pub fn set_right(&mut self, value: f32) {
        self.center.x = value - self.size.x / 2.0;
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    pub fn set_bottom(&mut self, value: f32) {
        self.center.y = value - self.size.y / 2.0;
    }

    /// The view rectangle in world pixels.
    pub fn bounds(&self) -> Rect {
        Rect::new((self.left(), self.top()), (self.size.x, self.size.y))
    }

    fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Follows a drawable's position. The handle is non-owning: if the
    /// drawable is removed the camera simply stops moving.
    pub fn follow(&mut self, target: DrawableId) {
        self.follow = Some(target);
    }

    pub fn unfollow(&mut self) {
        self.follow = None;
    }

    /// Starts a shake. Replaces any shake in progress: re-triggering restarts
    /// the effect, it does not queue or extend it.
    pub fn quake(&mut self, duration: f32, amplitude: f32, horizontal: bool, vertical: bool) {
        self.state = CameraState::Quake {
            duration,
            amplitude,
            direction: Vec2::new(
                if horizontal { 1.0 } else { 0.0 },
                if vertical { 1.0 } else { 0.0 },
            ),
            elapsed: 0.0,
        };
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Per-frame camera logic: remove the previous shake offset, run follow
    /// smoothing and clamping on the unshaken position, then apply a fresh
    /// shake offset.
    pub fn update(&mut self, dt: f32, ctx: &FrameContext) {
        self.move_by(-self.offset);

        if let Some(target) = self.follow {
            if let Some(drawable) = ctx.store.get_dyn(target) {
                let dif = drawable.position() - self.center;
                if self.frames_delay > 0 {
                    self.move_by(dif / self.frames_delay as f32);
                    if let Some(map) = ctx.map {
                        let bounds = map.pixel_size();
                        if self.left() < 0.0 {
                            self.set_left(0.0);
                        } else if self.right() > bounds.x {
                            self.set_right(bounds.x);
                        }
                        if self.top() < 0.0 {
                            self.set_top(0.0);
                        } else if self.bottom() > bounds.y {
                            self.set_bottom(bounds.y);
                        }
                    }
                } else {
                    self.center = drawable.position();
                }
            } else {
                log::debug!("camera '{}' follow target is gone, skipping", self.name);
            }
        }

        self.state.tick(dt);
        self.offset = self.state.offset();
        self.move_by(self.offset);

        if self.state.expired() {
            self.state = CameraState::Idle;
        }
    }

    /// Orthographic projection of the view rectangle to clip space.
    pub fn view_projection(&self) -> Mat4 {
        let b = self.bounds();
        Mat4::orthographic_rh_gl(b.left, b.right(), b.bottom(), b.top, -1.0, 1.0)
    }

    /// The full world-to-window transform: view projection embedded into the
    /// camera's normalized viewport.
    pub fn render_transform(&self) -> Mat4 {
        let vp = self.viewport;
        let ndc_x = 2.0 * (vp.left + vp.width / 2.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * (vp.top + vp.height / 2.0);
        Mat4::from_translation(Vec3::new(ndc_x, ndc_y, 0.0))
            * Mat4::from_scale(Vec3::new(vp.width, vp.height, 1.0))
            * self.view_projection()
    }
}
