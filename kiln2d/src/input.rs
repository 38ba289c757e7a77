use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::KeyCode,
};

/// Tracks keyboard state across frames.
///
/// Besides the usual down/pressed/released sets, an ordered list of held keys
/// is maintained, most recently pressed first. Entity control resolution is
/// order-sensitive: when both "left" and "right" are held, the most recent
/// press wins.
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    ordered: Vec<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            ordered: Vec::new(),
        }
    }

    /// Clear per-frame pressed/released flags.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let winit::keyboard::PhysicalKey::Code(keycode) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press(keycode),
                ElementState::Released => self.release(keycode),
            }
        }
    }

    /// Register a key press directly (the windowing layer is external).
    pub fn press(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.insert(key);
            self.ordered.insert(0, key);
        }
        self.keys_down.insert(key);
    }

    /// Register a key release directly.
    pub fn release(&mut self, key: KeyCode) {
        if self.keys_down.remove(&key) {
            self.ordered.retain(|k| *k != key);
        }
        self.keys_released.insert(key);
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Held keys, most recently pressed first.
    pub fn ordered_pressed(&self) -> &[KeyCode] {
        &self.ordered
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_list_puts_latest_press_first() {
        let mut input = InputState::new();
        input.press(KeyCode::ArrowRight);
        input.press(KeyCode::ArrowLeft);
        assert_eq!(
            input.ordered_pressed(),
            &[KeyCode::ArrowLeft, KeyCode::ArrowRight]
        );

        input.release(KeyCode::ArrowLeft);
        assert_eq!(input.ordered_pressed(), &[KeyCode::ArrowRight]);
    }

    #[test]
    fn pressed_flag_lasts_one_frame() {
        let mut input = InputState::new();
        input.press(KeyCode::Space);
        assert!(input.is_key_pressed(KeyCode::Space));
        input.begin_frame();
        assert!(!input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        // Holding the key does not re-trigger the pressed flag.
        input.press(KeyCode::Space);
        assert!(!input.is_key_pressed(KeyCode::Space));
    }
}
