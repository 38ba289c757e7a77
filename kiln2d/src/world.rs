use std::any::Any;
use std::collections::HashMap;

use crate::render::Drawable;

/// Non-owning handle to a drawable in a [`DrawableStore`].
///
/// Layers and cameras hold these instead of references; a handle whose
/// drawable has been removed simply stops resolving, so stale back-references
/// degrade to skipped items rather than dangling pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawableId(u32);

impl DrawableId {
    /// Get the underlying integer ID (useful for debugging or serialization).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// Owning container for everything game logic wants drawn through layers:
/// entities, effects, shapes.
///
/// Typed access goes through `Any` downcasting, so heterogeneous drawables
/// share one arena while callers still get concrete types back.
pub struct DrawableStore {
    next_id: u32,
    items: HashMap<DrawableId, Box<dyn Drawable>>,
}

impl DrawableStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            items: HashMap::new(),
        }
    }

    /// Takes ownership of a drawable and returns its handle.
    pub fn insert<T: Drawable>(&mut self, drawable: T) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.items.insert(id, Box::new(drawable));
        id
    }

    /// Removes a drawable. Handles pointing at it become dangling and are
    /// skipped wherever they are still referenced.
    pub fn remove(&mut self, id: DrawableId) -> bool {
        self.items.remove(&id).is_some()
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get_dyn(&self, id: DrawableId) -> Option<&dyn Drawable> {
        self.items.get(&id).map(|boxed| boxed.as_ref())
    }

    /// Typed access to a stored drawable.
    pub fn get<T: Drawable>(&self, id: DrawableId) -> Option<&T> {
        self.items
            .get(&id)
            .and_then(|boxed| (boxed.as_ref() as &dyn Any).downcast_ref::<T>())
    }

    /// Typed mutable access to a stored drawable.
    pub fn get_mut<T: Drawable>(&mut self, id: DrawableId) -> Option<&mut T> {
        self.items
            .get_mut(&id)
            .and_then(|boxed| (boxed.as_mut() as &mut dyn Any).downcast_mut::<T>())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &dyn Drawable)> {
        self.items.iter().map(|(id, boxed)| (*id, boxed.as_ref()))
    }
}

impl Default for DrawableStore {
    fn default() -> Self {
        Self::new()
    }
}
