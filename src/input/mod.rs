pub mod keymap;

use std::collections::HashSet;

pub use keymap::KeyMap;
pub use winit::keyboard::KeyCode;

/// Raw keyboard state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    keys_held: HashSet<KeyCode>,
    /// Edge-triggered presses in the order the platform reported them.
    keys_pressed: Vec<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down event.  Auto-repeat (key already held) is not an
    /// edge and is not queued again.
    pub fn press(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.push(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Forget held keys, e.g. when the window loses focus and the matching
    /// release events will never arrive.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
    }

    /// Drain this frame's presses, oldest first.
    pub fn take_pressed(&mut self) -> Vec<KeyCode> {
        std::mem::take(&mut self.keys_pressed)
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn pending_presses(&self) -> &[KeyCode] { &self.keys_pressed }
}
