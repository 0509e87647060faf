//! Events relayed from the terminal to the dispatch loop

use crate::keymap::Key;

/// One unit of terminal input, already translated to our key model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize { width: u16, height: u16 },
    /// The terminal read failed; the loop keeps going
    Error(String),
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        InputEvent::Key(key)
    }
}
