use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Rect).unwrap(), "\"rect\"");
}

// =============================================================
// Modifiers / Button
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn modifiers_deserialize_missing_as_false() {
    let m: Modifiers = serde_json::from_str(r#"{"shift": true}"#).unwrap();
    assert!(m.shift);
    assert!(!m.ctrl);
}

#[test]
fn button_deserializes_lowercase() {
    let b: Button = serde_json::from_str("\"middle\"").unwrap();
    assert_eq!(b, Button::Middle);
}

// =============================================================
// Key
// =============================================================

#[test]
fn key_classifiers() {
    assert!(Key("Escape".into()).is_escape());
    assert!(Key("Enter".into()).is_enter());
    assert!(Key(" ".into()).is_space());
    assert!(Key("r".into()).is_rect_toggle());
    assert!(Key("R".into()).is_rect_toggle());
    assert!(!Key("t".into()).is_rect_toggle());
    assert!(!Key("Esc".into()).is_escape());
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
}

#[test]
fn pointer_gestures_capture() {
    let id = uuid::Uuid::new_v4();
    let p = Point::new(0.0, 0.0);
    let capturing = [
        InputState::Panning { button: Button::Middle, anchor_screen: p, anchor_camera: Camera::default() },
        InputState::DrawingRect { start_world: p, current_world: p },
        InputState::DraggingItem { id, anchor_screen: p, orig: p },
        InputState::ResizingItem {
            id,
            anchor_screen: p,
            orig_width: 1.0,
            orig_height: 1.0,
            corner: ResizeCorner::Se,
        },
    ];
    for state in capturing {
        assert!(state.captures_pointer(), "{state:?} should capture");
        assert!(!state.is_editing());
    }
}

#[test]
fn editing_states_do_not_capture() {
    let id = uuid::Uuid::new_v4();
    let editing = [
        InputState::EditingText { world: Point::new(0.0, 0.0), item_id: None, draft: String::new(), measured: None },
        InputState::EditingRectTitle { item_id: id, draft: String::new() },
    ];
    for state in editing {
        assert!(!state.captures_pointer());
        assert!(state.is_editing());
    }
    assert!(!InputState::Idle.captures_pointer());
}

#[test]
fn gesture_button_follows_the_press() {
    let p = Point::new(0.0, 0.0);
    let space_pan = InputState::Panning { button: Button::Primary, anchor_screen: p, anchor_camera: Camera::default() };
    let middle_pan = InputState::Panning { button: Button::Middle, anchor_screen: p, anchor_camera: Camera::default() };
    assert_eq!(space_pan.gesture_button(), Some(Button::Primary));
    assert_eq!(middle_pan.gesture_button(), Some(Button::Middle));
    assert_eq!(InputState::DrawingRect { start_world: p, current_world: p }.gesture_button(), Some(Button::Primary));
    assert_eq!(InputState::Idle.gesture_button(), None);
}
