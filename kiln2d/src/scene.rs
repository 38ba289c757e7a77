use std::collections::BTreeMap;

use crate::context::FrameContext;
use crate::layer::{Layer, Mask};
use crate::render::{Color, RenderStates, RenderTarget, Surface};

/// An offscreen composition of ordered layers and masks.
///
/// Order 0 is drawn first, then 1, and so on. A layer and a mask may share an
/// order index; the layer is drawn first, so the mask always sits visually
/// above it.
pub struct Scene {
    surface: Surface,
    layers: BTreeMap<i32, Layer>,
    masks: BTreeMap<i32, Mask>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            layers: BTreeMap::new(),
            masks: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Adds a layer at the given order, replacing any layer already there.
    pub fn add_layer(&mut self, layer: Layer, order: i32) {
        self.layers.insert(order, layer);
    }

    pub fn remove_layer(&mut self, order: i32) -> Option<Layer> {
        self.layers.remove(&order)
    }

    pub fn remove_layer_named(&mut self, name: &str) -> Option<Layer> {
        let order = self
            .layers
            .iter()
            .find(|(_, l)| l.name == name)
            .map(|(order, _)| *order)?;
        self.layers.remove(&order)
    }

    pub fn layer_at(&self, order: i32) -> Option<&Layer> {
        self.layers.get(&order)
    }

    pub fn layer_at_mut(&mut self, order: i32) -> Option<&mut Layer> {
        self.layers.get_mut(&order)
    }

    pub fn get_layer(&self, name: &str) -> Option<&Layer> {
        self.layers.values().find(|l| l.name == name)
    }

    pub fn get_layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.values_mut().find(|l| l.name == name)
    }

    pub fn layers(&self) -> impl Iterator<Item = (i32, &Layer)> {
        self.layers.iter().map(|(order, layer)| (*order, layer))
    }

    pub fn add_mask(&mut self, mask: Mask, order: i32) {
        self.masks.insert(order, mask);
    }

    pub fn remove_mask(&mut self, name: &str) -> Option<Mask> {
        let order = self
            .masks
            .iter()
            .find(|(_, m)| m.name == name)
            .map(|(order, _)| *order)?;
        self.masks.remove(&order)
    }

    pub fn mask_at(&self, order: i32) -> Option<&Mask> {
        self.masks.get(&order)
    }

    pub fn has_masks(&self) -> bool {
        !self.masks.is_empty()
    }

    /// Composes all layers and masks onto the scene surface in ascending
    /// order, layer before mask at equal indices. Layers are updated (pruned,
    /// optionally Y-sorted) and masks recomposed as part of the pass.
    pub fn render(&mut self, ctx: &FrameContext) {
        self.surface.clear(Color::TRANSPARENT);

        let max_layer = self.layers.keys().next_back().copied().unwrap_or(0);
        let max_mask = self.masks.keys().next_back().copied().unwrap_or(0);

        for order in 0..=max_layer.max(max_mask) {
            if let Some(layer) = self.layers.get_mut(&order) {
                layer.update(ctx);
                layer.draw(&mut self.surface, RenderStates::default(), ctx);
            }
            if let Some(mask) = self.masks.get_mut(&order) {
                mask.update(ctx);
                mask.draw(&mut self.surface, RenderStates::default());
            }
        }
    }

    /// The composed surface, ready for a camera to map into its viewport.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}
