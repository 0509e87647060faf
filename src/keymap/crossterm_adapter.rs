//! Adapter to convert crossterm events to our Key type
//!
//! crossterm reports Ctrl as a modifier flag; on a terminal it is part of the
//! control code, so Ctrl chords are folded into the termbox code range here.

use crossterm::event::{
    KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use super::types::{
    function_key, Key, Modifier, KEY_ARROW_DOWN, KEY_ARROW_LEFT, KEY_ARROW_RIGHT, KEY_ARROW_UP,
    KEY_BACKSPACE2, KEY_DELETE, KEY_END, KEY_ENTER,
    KEY_ESC, KEY_HOME, KEY_INSERT, KEY_MOUSE_LEFT, KEY_MOUSE_MIDDLE, KEY_MOUSE_RIGHT, KEY_PGDN,
    KEY_PGUP, KEY_SPACE, KEY_TAB,
};

/// Convert a crossterm key event to our Key type
///
/// Returns None for key releases and keys with no terminal code.
pub fn key_from_crossterm(event: &KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let modifier = if event.modifiers.contains(KeyModifiers::ALT) {
        Modifier::Alt
    } else {
        Modifier::None
    };

    let key = match event.code {
        CtKeyCode::Char(c) if ctrl => Key::ctrl(c)?,
        CtKeyCode::Char(' ') => Key::code(KEY_SPACE),
        CtKeyCode::Char(c) => Key::char(c),

        CtKeyCode::Enter => Key::code(KEY_ENTER),
        CtKeyCode::Tab => Key::code(KEY_TAB),
        CtKeyCode::Backspace => Key::code(KEY_BACKSPACE2),
        CtKeyCode::Esc => Key::code(KEY_ESC),

        // Navigation
        CtKeyCode::Insert => Key::code(KEY_INSERT),
        CtKeyCode::Delete => Key::code(KEY_DELETE),
        CtKeyCode::Home => Key::code(KEY_HOME),
        CtKeyCode::End => Key::code(KEY_END),
        CtKeyCode::PageUp => Key::code(KEY_PGUP),
        CtKeyCode::PageDown => Key::code(KEY_PGDN),

        // Arrows
        CtKeyCode::Up => Key::code(KEY_ARROW_UP),
        CtKeyCode::Down => Key::code(KEY_ARROW_DOWN),
        CtKeyCode::Left => Key::code(KEY_ARROW_LEFT),
        CtKeyCode::Right => Key::code(KEY_ARROW_RIGHT),

        CtKeyCode::F(n @ 1..=12) => Key::code(function_key(n)),

        _ => return None,
    };

    Some(Key { modifier, ..key })
}

/// Convert a mouse button press to one of the mouse keys
pub fn key_from_mouse(event: &MouseEvent) -> Option<Key> {
    let MouseEventKind::Down(button) = event.kind else {
        return None;
    };
    let code = match button {
        MouseButton::Left => KEY_MOUSE_LEFT,
        MouseButton::Middle => KEY_MOUSE_MIDDLE,
        MouseButton::Right => KEY_MOUSE_RIGHT,
    };
    let modifier = if event.modifiers.contains(KeyModifiers::ALT) {
        Modifier::Alt
    } else {
        Modifier::None
    };
    Some(Key {
        modifier,
        ..Key::code(code)
    })
}
