//! Core types for the keymap system: Key, Modifier, KeySequence
//!
//! Key codes follow the termbox numbering so that descriptors from existing
//! peco-style configuration files resolve to the same identities the
//! terminal adapter produces.

use std::fmt;

// Control-code range. Several names share a code because the terminal
// cannot tell them apart (e.g. Tab and C-i).
pub const KEY_CTRL_TILDE: u16 = 0x00;
pub const KEY_CTRL_A: u16 = 0x01;
pub const KEY_BACKSPACE: u16 = 0x08;
pub const KEY_TAB: u16 = 0x09;
pub const KEY_ENTER: u16 = 0x0D;
pub const KEY_ESC: u16 = 0x1B;
pub const KEY_SPACE: u16 = 0x20;
pub const KEY_BACKSPACE2: u16 = 0x7F;
pub const KEY_CTRL_8: u16 = 0x7F;

// Function and navigation keys count down from the top of the u16 range.
pub const KEY_F1: u16 = 0xFFFF;
pub const KEY_F12: u16 = KEY_F1 - 11;
pub const KEY_INSERT: u16 = KEY_F12 - 1;
pub const KEY_DELETE: u16 = KEY_F12 - 2;
pub const KEY_HOME: u16 = KEY_F12 - 3;
pub const KEY_END: u16 = KEY_F12 - 4;
pub const KEY_PGUP: u16 = KEY_F12 - 5;
pub const KEY_PGDN: u16 = KEY_F12 - 6;
pub const KEY_ARROW_UP: u16 = KEY_F12 - 7;
pub const KEY_ARROW_DOWN: u16 = KEY_F12 - 8;
pub const KEY_ARROW_LEFT: u16 = KEY_F12 - 9;
pub const KEY_ARROW_RIGHT: u16 = KEY_F12 - 10;
// termbox reserves one slot between the arrows and the mouse buttons
pub const KEY_MOUSE_LEFT: u16 = KEY_ARROW_RIGHT - 2;
pub const KEY_MOUSE_MIDDLE: u16 = KEY_ARROW_RIGHT - 3;
pub const KEY_MOUSE_RIGHT: u16 = KEY_ARROW_RIGHT - 4;

/// Function key code for `F<n>` (1-based)
pub const fn function_key(n: u8) -> u16 {
    KEY_F1 - (n as u16 - 1)
}

/// Control code a terminal sends for Ctrl + `c`
///
/// Letters are case-insensitive. Characters with no control code (digits
/// 1 and 9, most punctuation, non-ASCII) return None.
pub fn ctrl_code(c: char) -> Option<u16> {
    let code = match c.to_ascii_lowercase() {
        letter @ 'a'..='z' => KEY_CTRL_A + (letter as u16 - 'a' as u16),
        ' ' | '2' | '@' | '~' => KEY_CTRL_TILDE,
        '[' | '3' => KEY_ESC,
        '4' | '\\' => 0x1C,
        '5' | ']' => 0x1D,
        '6' | '^' => 0x1E,
        '7' | '/' | '_' => 0x1F,
        '8' => KEY_CTRL_8,
        _ => return None,
    };
    Some(code)
}

/// Key modifier. Only Alt is distinguishable on a plain terminal; Ctrl is
/// folded into the key code itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    #[default]
    None,
    Alt,
}

/// Identity of one terminal key press
///
/// Canonical form: a printable character has `code == 0` and `ch` set; every
/// other key has `ch == '\0'` and a termbox-compatible `code`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub modifier: Modifier,
    pub code: u16,
    pub ch: char,
}

impl Key {
    /// A special (non-character) key with no modifier
    pub const fn code(code: u16) -> Self {
        Self {
            modifier: Modifier::None,
            code,
            ch: '\0',
        }
    }

    /// A printable character key with no modifier
    pub const fn char(ch: char) -> Self {
        Self {
            modifier: Modifier::None,
            code: 0,
            ch,
        }
    }

    /// The key a terminal sends for Ctrl + `c`, if it has one
    pub fn ctrl(c: char) -> Option<Self> {
        ctrl_code(c).map(Self::code)
    }

    /// The same key with the Alt modifier set
    #[must_use]
    pub const fn with_alt(mut self) -> Self {
        self.modifier = Modifier::Alt;
        self
    }

    #[inline]
    pub const fn is_alt(&self) -> bool {
        matches!(self.modifier, Modifier::Alt)
    }

    /// A bare Escape press: the ambiguous lead byte of an Alt chord
    #[inline]
    pub const fn is_plain_escape(&self) -> bool {
        !self.is_alt() && self.ch == '\0' && self.code == KEY_ESC
    }

    /// The character a literal insert would produce, if any
    ///
    /// Space arrives as a key code rather than a character.
    pub fn printable(&self) -> Option<char> {
        if self.ch != '\0' {
            Some(self.ch)
        } else if self.code == KEY_SPACE {
            Some(' ')
        } else {
            None
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::notation::format_key(*self))
    }
}

/// An ordered, non-empty chain of keys bound as one unit
///
/// Ordering is lexicographic, so a sequence sorts directly before all of its
/// extensions.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeySequence(Vec<Key>);

impl KeySequence {
    /// Build a sequence; `None` for an empty key list
    pub fn new(keys: Vec<Key>) -> Option<Self> {
        if keys.is_empty() {
            None
        } else {
            Some(Self(keys))
        }
    }

    /// A sequence consisting of one key
    pub fn single(key: Key) -> Self {
        Self(vec![key])
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if this is a chain (more than one key)
    pub fn is_chain(&self) -> bool {
        self.0.len() > 1
    }

    pub fn starts_with(&self, prefix: &KeySequence) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}
