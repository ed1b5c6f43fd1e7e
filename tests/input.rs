use te::input::*;

#[test]
fn letters_digits_and_function_keys() {
    let map = KeyMap::new();
    assert_eq!(map.name(KeyCode::KeyA), Some("a"));
    assert_eq!(map.name(KeyCode::KeyZ), Some("z"));
    assert_eq!(map.name(KeyCode::Digit0), Some("0"));
    assert_eq!(map.name(KeyCode::F1), Some("f1"));
    assert_eq!(map.name(KeyCode::F24), Some("f24"));
}

#[test]
fn named_keys() {
    let map = KeyMap::new();
    let cases = [
        (KeyCode::ArrowUp, "up"),
        (KeyCode::Enter, "return"),
        (KeyCode::Escape, "escape"),
        (KeyCode::ShiftLeft, "lshift"),
        (KeyCode::SuperRight, "rgui"),
        (KeyCode::ContextMenu, "menu"),
        (KeyCode::Backslash, "\\"),
        (KeyCode::Backquote, "`"),
        (KeyCode::NumpadEnter, "kpenter"),
        (KeyCode::NumpadAdd, "kp+"),
    ];
    for (code, name) in cases {
        assert_eq!(map.name(code), Some(name), "{code:?}");
        assert_eq!(map.code(name), Some(code), "{name}");
    }
}

#[test]
fn unmapped_keys_have_no_name() {
    let map = KeyMap::new();
    assert_eq!(map.name(KeyCode::MediaPlayPause), None);
    assert_eq!(map.name(KeyCode::Fn), None);
}

#[test]
fn reverse_lookup_ignores_ascii_case() {
    let map = KeyMap::new();
    assert_eq!(map.code("LEFT"), Some(KeyCode::ArrowLeft));
    assert_eq!(map.code("Return"), Some(KeyCode::Enter));
    assert_eq!(map.code("KPENTER"), Some(KeyCode::NumpadEnter));
    assert_eq!(map.code("nosuchkey"), None);
}

#[test]
fn every_name_round_trips() {
    let map = KeyMap::new();
    assert!(!map.is_empty());
    let mut count = 0;
    for name in map.names() {
        let code = map.code(name).unwrap();
        assert_eq!(map.name(code), Some(name));
        count += 1;
    }
    assert_eq!(count, map.len(), "names are unique");
}

// ── InputState ──────────────────────────────────────────────────────────────

#[test]
fn presses_are_queued_in_order() {
    let mut input = InputState::new();
    input.press(KeyCode::KeyB);
    input.press(KeyCode::KeyA);
    assert_eq!(input.take_pressed(), [KeyCode::KeyB, KeyCode::KeyA]);
    assert!(input.take_pressed().is_empty());
    assert!(input.is_key_held(KeyCode::KeyA));
}

#[test]
fn auto_repeat_is_not_an_edge() {
    let mut input = InputState::new();
    input.press(KeyCode::Space);
    input.press(KeyCode::Space);
    assert_eq!(input.pending_presses(), [KeyCode::Space]);

    input.release(KeyCode::Space);
    input.press(KeyCode::Space);
    assert_eq!(input.pending_presses(), [KeyCode::Space, KeyCode::Space]);
}

#[test]
fn release_all_forgets_held_keys() {
    let mut input = InputState::new();
    input.press(KeyCode::KeyW);
    input.press(KeyCode::ShiftLeft);
    input.release_all();
    assert!(!input.is_key_held(KeyCode::KeyW));
    assert!(!input.is_key_held(KeyCode::ShiftLeft));
}
