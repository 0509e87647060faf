//! Key descriptor grammar
//!
//! Descriptors use the emacs-ish notation of peco configuration files:
//! `"C-a"`, `"M-x"`, `"Pgup"`, `"M-C-f"`. A chain is written as descriptors
//! separated by whitespace: `"C-x C-c"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::config::KeymapError;
use super::types::{
    function_key, Key, KeySequence, Modifier, KEY_ARROW_RIGHT, KEY_BACKSPACE, KEY_BACKSPACE2,
    KEY_CTRL_8, KEY_CTRL_TILDE, KEY_ENTER, KEY_ESC, KEY_F12, KEY_SPACE, KEY_TAB,
};

const ALT_PREFIX: &str = "M-";

const NAVIGATION_KEYS: [&str; 10] = [
    "Insert",
    "Delete",
    "Home",
    "End",
    "Pgup",
    "Pgdn",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
];

const MOUSE_BUTTONS: [&str; 3] = ["Left", "Middle", "Right"];

/// Ctrl aliases, one group per consecutive control code starting at 0.
/// The first name in each group is the one used when formatting.
const CTRL_GROUPS: [&[&str]; 32] = [
    &["~", "2", "Space"],
    &["a"],
    &["b"],
    &["c"],
    &["d"],
    &["e"],
    &["f"],
    &["g"],
    &["h"],
    &["i"],
    &["j"],
    &["k"],
    &["l"],
    &["m"],
    &["n"],
    &["o"],
    &["p"],
    &["q"],
    &["r"],
    &["s"],
    &["t"],
    &["u"],
    &["v"],
    &["w"],
    &["x"],
    &["y"],
    &["z"],
    &["[", "3"],
    &["4", "\\"],
    &["5", "]"],
    &["6"],
    &["7", "/", "_"],
];

/// Named specials. These take precedence over Ctrl aliases when formatting.
const SPECIAL_KEYS: [(&str, u16); 7] = [
    ("BS", KEY_BACKSPACE),
    ("Tab", KEY_TAB),
    ("Enter", KEY_ENTER),
    ("Esc", KEY_ESC),
    ("Space", KEY_SPACE),
    ("BS2", KEY_BACKSPACE2),
    ("C-8", KEY_CTRL_8),
];

struct DescriptorTable {
    by_name: HashMap<String, u16>,
    by_code: HashMap<u16, String>,
}

impl DescriptorTable {
    fn build() -> Self {
        let mut table = Self {
            by_name: HashMap::new(),
            by_code: HashMap::new(),
        };

        for (name, code) in SPECIAL_KEYS {
            table.add(name.to_string(), code);
        }

        for n in 1..=12u8 {
            table.add(format!("F{}", n), function_key(n));
        }

        for (i, name) in NAVIGATION_KEYS.iter().enumerate() {
            table.add(name.to_string(), KEY_F12 - (i as u16 + 1));
        }

        for (i, name) in MOUSE_BUTTONS.iter().enumerate() {
            table.add(format!("Mouse{}", name), KEY_ARROW_RIGHT - (i as u16 + 2));
        }

        for (i, group) in CTRL_GROUPS.iter().enumerate() {
            for name in group.iter() {
                table.add(format!("C-{}", name), KEY_CTRL_TILDE + i as u16);
            }
        }

        table
    }

    /// Register a name; the first name seen for a code becomes its display form
    fn add(&mut self, name: String, code: u16) {
        self.by_code.entry(code).or_insert_with(|| name.clone());
        self.by_name.insert(name, code);
    }
}

static DESCRIPTORS: LazyLock<DescriptorTable> = LazyLock::new(DescriptorTable::build);

/// Parse a single key descriptor like `"C-a"`, `"M-x"` or `"Pgup"`
pub fn parse_key(descriptor: &str) -> Result<Key, KeymapError> {
    let (modifier, rest) = match descriptor.strip_prefix(ALT_PREFIX) {
        Some(rest) => (Modifier::Alt, rest),
        None => (Modifier::None, descriptor),
    };

    let mut chars = rest.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(Key {
            modifier,
            ..single_char_key(ch)
        });
    }

    DESCRIPTORS
        .by_name
        .get(rest)
        .map(|&code| Key {
            modifier,
            ..Key::code(code)
        })
        .ok_or_else(|| KeymapError::UnknownKey(descriptor.to_string()))
}

/// Parse a whitespace-separated chain like `"C-x C-c"`
pub fn parse_sequence(descriptor: &str) -> Result<KeySequence, KeymapError> {
    let keys = descriptor
        .split_whitespace()
        .map(parse_key)
        .collect::<Result<Vec<_>, _>>()?;

    KeySequence::new(keys).ok_or(KeymapError::EmptySequence)
}

/// Render a key back into descriptor notation
pub fn format_key(key: Key) -> String {
    let prefix = if key.is_alt() { ALT_PREFIX } else { "" };

    if key.ch != '\0' {
        return format!("{}{}", prefix, key.ch);
    }

    match DESCRIPTORS.by_code.get(&key.code) {
        Some(name) => format!("{}{}", prefix, name),
        None => format!("{}<{:#06x}>", prefix, key.code),
    }
}

/// A lone character in a descriptor. A space is the Space key, since that is
/// how the terminal reports it.
fn single_char_key(ch: char) -> Key {
    if ch == ' ' {
        Key::code(KEY_SPACE)
    } else {
        Key::char(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::*;

    #[test]
    fn test_parse_ctrl_letters() {
        assert_eq!(parse_key("C-a").unwrap(), Key::code(0x01));
        assert_eq!(parse_key("C-z").unwrap(), Key::code(0x1A));
    }

    #[test]
    fn test_parse_ctrl_punctuation_aliases() {
        assert_eq!(parse_key("C-~").unwrap().code, 0x00);
        assert_eq!(parse_key("C-2").unwrap().code, 0x00);
        assert_eq!(parse_key("C-Space").unwrap().code, 0x00);
        assert_eq!(parse_key("C-[").unwrap().code, KEY_ESC);
        assert_eq!(parse_key("C-3").unwrap().code, KEY_ESC);
        assert_eq!(parse_key("C-\\").unwrap().code, 0x1C);
        assert_eq!(parse_key("C-]").unwrap().code, 0x1D);
        assert_eq!(parse_key("C-6").unwrap().code, 0x1E);
        assert_eq!(parse_key("C-_").unwrap().code, 0x1F);
        assert_eq!(parse_key("C-/").unwrap().code, 0x1F);
        assert_eq!(parse_key("C-8").unwrap().code, KEY_CTRL_8);
    }

    #[test]
    fn test_parse_named_specials() {
        assert_eq!(parse_key("BS").unwrap(), Key::code(KEY_BACKSPACE));
        assert_eq!(parse_key("BS2").unwrap(), Key::code(KEY_BACKSPACE2));
        assert_eq!(parse_key("Tab").unwrap(), Key::code(KEY_TAB));
        assert_eq!(parse_key("Enter").unwrap(), Key::code(KEY_ENTER));
        assert_eq!(parse_key("Esc").unwrap(), Key::code(KEY_ESC));
        assert_eq!(parse_key("Space").unwrap(), Key::code(KEY_SPACE));
    }

    #[test]
    fn test_parse_function_and_navigation_keys() {
        assert_eq!(parse_key("F1").unwrap(), Key::code(KEY_F1));
        assert_eq!(parse_key("F12").unwrap(), Key::code(KEY_F12));
        assert_eq!(parse_key("Insert").unwrap(), Key::code(KEY_INSERT));
        assert_eq!(parse_key("Pgup").unwrap(), Key::code(KEY_PGUP));
        assert_eq!(parse_key("Pgdn").unwrap(), Key::code(KEY_PGDN));
        assert_eq!(parse_key("ArrowRight").unwrap(), Key::code(KEY_ARROW_RIGHT));
        assert_eq!(parse_key("MouseLeft").unwrap(), Key::code(KEY_MOUSE_LEFT));
        assert_eq!(parse_key("MouseMiddle").unwrap(), Key::code(KEY_MOUSE_MIDDLE));
        assert_eq!(parse_key("MouseRight").unwrap(), Key::code(KEY_MOUSE_RIGHT));
    }

    #[test]
    fn test_parse_alt_single_char() {
        assert_eq!(parse_key("M-x").unwrap(), Key::char('x').with_alt());
        assert_eq!(parse_key("M-<").unwrap(), Key::char('<').with_alt());
    }

    #[test]
    fn test_parse_alt_named() {
        assert_eq!(parse_key("M-C-f").unwrap(), Key::ctrl('f').unwrap().with_alt());
        assert_eq!(parse_key("M-BS2").unwrap(), Key::code(KEY_BACKSPACE2).with_alt());
    }

    #[test]
    fn test_parse_bare_char() {
        assert_eq!(parse_key("q").unwrap(), Key::char('q'));
        assert_eq!(parse_key("é").unwrap(), Key::char('é'));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_key("Hyper-x"),
            Err(KeymapError::UnknownKey("Hyper-x".to_string()))
        );
        assert!(parse_key("C-").is_err());
        assert!(parse_key("M-").is_err());
        assert!(parse_key("").is_err());
    }

    #[test]
    fn test_parse_sequence() {
        let seq = parse_sequence("C-x  C-c").unwrap();
        assert_eq!(seq.keys(), &[Key::ctrl('x').unwrap(), Key::ctrl('c').unwrap()]);

        let seq = parse_sequence("M-f").unwrap();
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_parse_sequence_errors() {
        assert_eq!(parse_sequence("   "), Err(KeymapError::EmptySequence));
        assert_eq!(
            parse_sequence("C-x Nope"),
            Err(KeymapError::UnknownKey("Nope".to_string()))
        );
    }

    #[test]
    fn test_format_prefers_named_specials() {
        assert_eq!(format_key(Key::code(KEY_ESC)), "Esc");
        assert_eq!(format_key(Key::code(KEY_TAB)), "Tab");
        assert_eq!(format_key(Key::code(KEY_BACKSPACE)), "BS");
        assert_eq!(format_key(Key::ctrl('a').unwrap()), "C-a");
        assert_eq!(format_key(Key::code(0x00)), "C-~");
        assert_eq!(format_key(Key::char('f').with_alt()), "M-f");
        assert_eq!(format_key(Key::code(KEY_F1 - 4)), "F5");
    }

    #[test]
    fn test_format_sequence() {
        let seq = parse_sequence("C-x M-BS2 k").unwrap();
        assert_eq!(seq.to_string(), "C-x M-BS2 k");
    }
}
