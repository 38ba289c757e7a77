use crate::camera::Camera;
use crate::context::FrameContext;
use crate::math::{Rect, Vec2};
use crate::render::{RenderStates, RenderTarget};
use crate::scene::Scene;

/// Handle to a scene owned by a [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneId(pub(crate) usize);

/// Handle to a camera owned by a [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraId(pub(crate) usize);

/// Owns the scenes and cameras of a game and drives composition.
///
/// The windowing loop stays external: it feeds `scale_view` on resize and a
/// render target each frame, and the stage maps every visible camera's scene
/// onto it in render order.
pub struct Stage {
    design_size: Vec2,
    scenes: Vec<Scene>,
    cameras: Vec<Camera>,
}

impl Stage {
    /// `design_width`/`design_height` define the aspect ratio that viewport
    /// rescaling preserves.
    pub fn new(design_width: f32, design_height: f32) -> Self {
        Self {
            design_size: Vec2::new(design_width, design_height),
            scenes: Vec::new(),
            cameras: Vec::new(),
        }
    }

    pub fn design_size(&self) -> Vec2 {
        self.design_size
    }

    /// Creates a new scene and returns its handle.
    pub fn create_scene(&mut self, width: u32, height: u32) -> SceneId {
        self.scenes.push(Scene::new(width, height));
        SceneId(self.scenes.len() - 1)
    }

    /// Creates a new camera looking at `view` (world pixels) through
    /// `viewport` (normalized, `None` for the full window).
    ///
    /// `render_order` 0 is presented first; higher orders draw on top.
    pub fn create_camera(
        &mut self,
        name: impl Into<String>,
        render_order: i32,
        view: Rect,
        viewport: Option<Rect>,
    ) -> CameraId {
        let mut camera = Camera::new(name, render_order);
        camera.reset(view.top_left(), view.size());
        let viewport = viewport.unwrap_or(Rect::new((0.0, 0.0), (1.0, 1.0)));
        camera.reset_viewport(viewport.top_left(), viewport.size());
        self.cameras.push(camera);
        CameraId(self.cameras.len() - 1)
    }

    pub fn scene(&self, id: SceneId) -> &Scene {
        &self.scenes[id.0]
    }

    pub fn scene_mut(&mut self, id: SceneId) -> &mut Scene {
        &mut self.scenes[id.0]
    }

    pub fn camera(&self, id: CameraId) -> &Camera {
        &self.cameras[id.0]
    }

    pub fn camera_mut(&mut self, id: CameraId) -> &mut Camera {
        &mut self.cameras[id.0]
    }

    pub fn camera_by_name(&self, name: &str) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.name == name)
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// Runs per-frame camera logic (follow smoothing, shake) for every
    /// camera.
    pub fn update_cameras(&mut self, dt: f32, ctx: &FrameContext) {
        for camera in &mut self.cameras {
            camera.update(dt, ctx);
        }
    }

    /// Rescales every camera's viewport so the design aspect ratio is
    /// preserved inside the given window, letterboxing or pillarboxing as
    /// needed. Call on window resize.
    pub fn scale_view(&mut self, window_size: Vec2) {
        let design_ratio = self.design_size.x / self.design_size.y;
        let (viewport_x, viewport_y, viewport_w, viewport_h);
        if window_size.x / window_size.y > design_ratio {
            // Wider than the design: pillarbox.
            viewport_w = (window_size.y * design_ratio) / window_size.x;
            viewport_h = 1.0;
            viewport_x = (1.0 - viewport_w) / 2.0;
            viewport_y = 0.0;
        } else {
            // Taller than the design: letterbox.
            viewport_w = 1.0;
            viewport_h = (window_size.x / design_ratio) / window_size.y;
            viewport_x = 0.0;
            viewport_y = (1.0 - viewport_h) / 2.0;
        }
        for camera in &mut self.cameras {
            let (base_pos, base_size) = camera.viewport_base();
            camera.set_viewport(Rect::new(
                (
                    viewport_x + base_pos.x * (1.0 - 2.0 * viewport_x),
                    viewport_y + base_pos.y * (1.0 - 2.0 * viewport_y),
                ),
                (viewport_w * base_size.x, viewport_h * base_size.y),
            ));
        }
    }

    /// Composes every scene, then presents each visible camera's scene onto
    /// the target in ascending render order.
    pub fn render(&mut self, target: &mut dyn RenderTarget, ctx: &FrameContext) {
        for scene in &mut self.scenes {
            scene.render(ctx);
        }

        let mut order: Vec<usize> = (0..self.cameras.len()).collect();
        order.sort_by_key(|&i| self.cameras[i].render_order);

        for &i in &order {
            let camera = &self.cameras[i];
            if !camera.visible {
                continue;
            }
            let Some(scene_id) = camera.scene() else {
                continue;
            };
            let states = RenderStates {
                transform: camera.render_transform(),
                ..RenderStates::default()
            };
            target.draw_surface(self.scenes[scene_id.0].surface(), states);
        }
    }
}
