use std::collections::HashMap;

use winit::keyboard::KeyCode;

/// Every named key.  Key codes missing from this table are never forwarded
/// to scripts.
const KEYS: &[(KeyCode, &str)] = &[
    // Letters
    (KeyCode::KeyA, "a"), (KeyCode::KeyB, "b"), (KeyCode::KeyC, "c"), (KeyCode::KeyD, "d"),
    (KeyCode::KeyE, "e"), (KeyCode::KeyF, "f"), (KeyCode::KeyG, "g"), (KeyCode::KeyH, "h"),
    (KeyCode::KeyI, "i"), (KeyCode::KeyJ, "j"), (KeyCode::KeyK, "k"), (KeyCode::KeyL, "l"),
    (KeyCode::KeyM, "m"), (KeyCode::KeyN, "n"), (KeyCode::KeyO, "o"), (KeyCode::KeyP, "p"),
    (KeyCode::KeyQ, "q"), (KeyCode::KeyR, "r"), (KeyCode::KeyS, "s"), (KeyCode::KeyT, "t"),
    (KeyCode::KeyU, "u"), (KeyCode::KeyV, "v"), (KeyCode::KeyW, "w"), (KeyCode::KeyX, "x"),
    (KeyCode::KeyY, "y"), (KeyCode::KeyZ, "z"),
    // Digits
    (KeyCode::Digit0, "0"), (KeyCode::Digit1, "1"), (KeyCode::Digit2, "2"),
    (KeyCode::Digit3, "3"), (KeyCode::Digit4, "4"), (KeyCode::Digit5, "5"),
    (KeyCode::Digit6, "6"), (KeyCode::Digit7, "7"), (KeyCode::Digit8, "8"),
    (KeyCode::Digit9, "9"),
    // Function keys
    (KeyCode::F1, "f1"), (KeyCode::F2, "f2"), (KeyCode::F3, "f3"), (KeyCode::F4, "f4"),
    (KeyCode::F5, "f5"), (KeyCode::F6, "f6"), (KeyCode::F7, "f7"), (KeyCode::F8, "f8"),
    (KeyCode::F9, "f9"), (KeyCode::F10, "f10"), (KeyCode::F11, "f11"), (KeyCode::F12, "f12"),
    (KeyCode::F13, "f13"), (KeyCode::F14, "f14"), (KeyCode::F15, "f15"), (KeyCode::F16, "f16"),
    (KeyCode::F17, "f17"), (KeyCode::F18, "f18"), (KeyCode::F19, "f19"), (KeyCode::F20, "f20"),
    (KeyCode::F21, "f21"), (KeyCode::F22, "f22"), (KeyCode::F23, "f23"), (KeyCode::F24, "f24"),
    // Arrows
    (KeyCode::ArrowUp, "up"), (KeyCode::ArrowDown, "down"),
    (KeyCode::ArrowLeft, "left"), (KeyCode::ArrowRight, "right"),
    // Modifiers
    (KeyCode::ShiftLeft, "lshift"), (KeyCode::ShiftRight, "rshift"),
    (KeyCode::ControlLeft, "lctrl"), (KeyCode::ControlRight, "rctrl"),
    (KeyCode::AltLeft, "lalt"), (KeyCode::AltRight, "ralt"),
    (KeyCode::SuperLeft, "lgui"), (KeyCode::SuperRight, "rgui"),
    // Editing and navigation
    (KeyCode::Space, "space"), (KeyCode::Enter, "return"), (KeyCode::Escape, "escape"),
    (KeyCode::Backspace, "backspace"), (KeyCode::Tab, "tab"), (KeyCode::Insert, "insert"),
    (KeyCode::Delete, "delete"), (KeyCode::Home, "home"), (KeyCode::End, "end"),
    (KeyCode::PageUp, "pageup"), (KeyCode::PageDown, "pagedown"),
    (KeyCode::CapsLock, "capslock"), (KeyCode::NumLock, "numlock"),
    (KeyCode::ScrollLock, "scrolllock"), (KeyCode::PrintScreen, "printscreen"),
    (KeyCode::Pause, "pause"), (KeyCode::ContextMenu, "menu"),
    // Punctuation (US layout positions)
    (KeyCode::Quote, "'"), (KeyCode::Comma, ","), (KeyCode::Minus, "-"),
    (KeyCode::Period, "."), (KeyCode::Slash, "/"), (KeyCode::Semicolon, ";"),
    (KeyCode::Equal, "="), (KeyCode::BracketLeft, "["), (KeyCode::Backslash, "\\"),
    (KeyCode::BracketRight, "]"), (KeyCode::Backquote, "`"),
    // Keypad
    (KeyCode::Numpad0, "kp0"), (KeyCode::Numpad1, "kp1"), (KeyCode::Numpad2, "kp2"),
    (KeyCode::Numpad3, "kp3"), (KeyCode::Numpad4, "kp4"), (KeyCode::Numpad5, "kp5"),
    (KeyCode::Numpad6, "kp6"), (KeyCode::Numpad7, "kp7"), (KeyCode::Numpad8, "kp8"),
    (KeyCode::Numpad9, "kp9"), (KeyCode::NumpadDecimal, "kp."), (KeyCode::NumpadComma, "kp,"),
    (KeyCode::NumpadDivide, "kp/"), (KeyCode::NumpadMultiply, "kp*"),
    (KeyCode::NumpadSubtract, "kp-"), (KeyCode::NumpadAdd, "kp+"),
    (KeyCode::NumpadEqual, "kp="), (KeyCode::NumpadEnter, "kpenter"),
];

/// Bidirectional lookup between platform key codes and the lowercase key
/// names scripts see.  Built once and never modified.
#[derive(Debug, Clone)]
pub struct KeyMap {
    by_code: HashMap<KeyCode, &'static str>,
    by_name: HashMap<&'static str, KeyCode>,
}

impl KeyMap {
    pub fn new() -> Self {
        let by_code = KEYS.iter().copied().collect();
        let by_name = KEYS.iter().map(|&(code, name)| (name, code)).collect();
        Self { by_code, by_name }
    }

    /// Canonical name for `code`, or `None` for intentionally unmapped keys.
    pub fn name(&self, code: KeyCode) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    /// Key code for `name`, ignoring ASCII case.
    pub fn code(&self, name: &str) -> Option<KeyCode> {
        if let Some(&code) = self.by_name.get(name) {
            return Some(code);
        }
        self.by_name.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn len(&self) -> usize { self.by_code.len() }
    pub fn is_empty(&self) -> bool { self.by_code.is_empty() }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        KEYS.iter().map(|&(_, name)| name)
    }
}

impl Default for KeyMap {
    fn default() -> Self { Self::new() }
}
