use crate::context::FrameContext;
use crate::math::Vec2;
use crate::render::{BlendMode, Color, Drawable, RenderStates, RenderTarget, Surface};
use crate::world::DrawableId;

/// A non-owning reference a layer can display.
///
/// Entities and effects live in the [`crate::world::DrawableStore`]; map
/// layers and object groups are owned by the current [`crate::tilemap::TiledMap`].
/// Either way the layer only holds a name or handle and resolves it at draw
/// time, skipping anything that no longer exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawRef {
    Stored(DrawableId),
    MapLayer(String),
    MapObjects(String),
}

impl From<DrawableId> for DrawRef {
    fn from(id: DrawableId) -> Self {
        Self::Stored(id)
    }
}

/// An ordered collection of drawable references composited at one depth
/// index of a [`crate::scene::Scene`].
pub struct Layer {
    pub name: String,
    items: Vec<DrawRef>,
    /// When set, the layer re-sorts by Y every update, keeping draw order
    /// depth-correct after movement.
    pub auto_ysort: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            auto_ysort: false,
        }
    }

    pub fn add(&mut self, item: impl Into<DrawRef>) {
        self.items.push(item.into());
    }

    /// Adds a reference to a named tile layer of the current map.
    pub fn add_map_layer(&mut self, name: impl Into<String>) {
        self.items.push(DrawRef::MapLayer(name.into()));
    }

    /// Adds a reference to a named object group of the current map
    /// (debug visualization of collision boxes and the like).
    pub fn add_map_objects(&mut self, name: impl Into<String>) {
        self.items.push(DrawRef::MapObjects(name.into()));
    }

    pub fn remove(&mut self, item: &DrawRef) {
        self.items.retain(|i| i != item);
    }

    pub fn remove_id(&mut self, id: DrawableId) {
        self.items.retain(|i| *i != DrawRef::Stored(id));
    }

    pub fn items(&self) -> &[DrawRef] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawRef> {
        self.items.iter()
    }

    fn item_y(item: &DrawRef, ctx: &FrameContext) -> f32 {
        match item {
            DrawRef::Stored(id) => ctx
                .store
                .get_dyn(*id)
                .map(|d| d.position().y)
                .unwrap_or(0.0),
            DrawRef::MapLayer(_) | DrawRef::MapObjects(_) => 0.0,
        }
    }

    /// Stable sort of the layer's drawables by vertical position, ascending.
    pub fn ysort(&mut self, ctx: &FrameContext) {
        self.items
            .sort_by(|a, b| Self::item_y(a, ctx).total_cmp(&Self::item_y(b, ctx)));
    }

    /// Prunes ended transient drawables and dangling handles, then applies
    /// the automatic Y-sort when enabled. Pruning is lazy: an effect that
    /// expired mid-frame disappears at the start of the next update.
    pub fn update(&mut self, ctx: &FrameContext) {
        self.items.retain(|item| match item {
            DrawRef::Stored(id) => match ctx.store.get_dyn(*id) {
                Some(drawable) => !drawable.ended(),
                None => {
                    log::debug!("pruning dangling drawable handle from layer");
                    false
                }
            },
            DrawRef::MapLayer(_) | DrawRef::MapObjects(_) => true,
        });
        if self.auto_ysort {
            self.ysort(ctx);
        }
    }

    pub fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, ctx: &FrameContext) {
        for item in &self.items {
            match item {
                DrawRef::Stored(id) => {
                    if let Some(drawable) = ctx.store.get_dyn(*id) {
                        drawable.draw(target, states, ctx);
                    }
                }
                DrawRef::MapLayer(name) => match ctx.map.and_then(|m| m.layer(name)) {
                    Some(layer) => layer.draw(target, states, ctx),
                    None => log::debug!("layer '{}': map layer '{}' not available", self.name, name),
                },
                DrawRef::MapObjects(name) => match ctx.map.and_then(|m| m.objectgroup(name)) {
                    Some(group) => group.draw(target, states, ctx),
                    None => {
                        log::debug!("layer '{}': objectgroup '{}' not available", self.name, name)
                    }
                },
            }
        }
    }
}

/// A layer variant composited through its own fill-colored offscreen pass.
///
/// Drawables render onto the fill with a replace blend, so the fill color
/// shows through wherever nothing covered it; the result is then drawn over
/// the scene as a single translucent sprite. This is what lighting and
/// fog-of-war effects are built from.
pub struct Mask {
    pub name: String,
    pub fill_color: Color,
    surface: Surface,
    items: Vec<DrawRef>,
}

impl Mask {
    pub fn new(name: impl Into<String>, width: u32, height: u32, fill_color: Color) -> Self {
        Self {
            name: name.into(),
            fill_color,
            surface: Surface::new(width, height),
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, item: impl Into<DrawRef>) {
        self.items.push(item.into());
    }

    pub fn remove(&mut self, item: &DrawRef) {
        self.items.retain(|i| i != item);
    }

    pub fn items(&self) -> &[DrawRef] {
        &self.items
    }

    /// Recomposes the mask surface: fill color, then each drawable with a
    /// replace blend (no alpha mixing against the fill).
    pub fn update(&mut self, ctx: &FrameContext) {
        self.surface.clear(self.fill_color);
        let states = RenderStates::with_blend(BlendMode::Replace);
        for item in &self.items {
            if let DrawRef::Stored(id) = item {
                if let Some(drawable) = ctx.store.get_dyn(*id) {
                    drawable.draw(&mut self.surface, states, ctx);
                }
            }
        }
    }

    /// Draws the composited mask surface as one sprite.
    pub fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates) {
        target.draw_surface(&self.surface, states);
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn position(&self) -> Vec2 {
        Vec2::ZERO
    }
}
