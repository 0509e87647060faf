//! Query line state: the characters typed so far and the caret position
//!
//! The query is stored as a `Vec<char>` so that the caret is a plain
//! character index.

use std::fmt;

use unicode_width::UnicodeWidthChar;

/// Character class used for word motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharType {
    Whitespace,
    WordChar,
    Punctuation,
}

fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if ch.is_alphanumeric() || ch == '_' {
        CharType::WordChar
    } else {
        CharType::Punctuation
    }
}

/// The editable query line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuffer {
    chars: Vec<char>,
    caret: usize,
}

impl QueryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the caret at the end
    pub fn with_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let caret = chars.len();
        Self { chars, caret }
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Terminal columns taken by the characters before the caret
    pub fn caret_width(&self) -> usize {
        self.chars[..self.caret]
            .iter()
            .map(|ch| ch.width().unwrap_or(0))
            .sum()
    }

    /// Move the caret, clamped to the query length
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.chars.len());
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Insert a character at the caret and advance past it
    pub fn insert_char(&mut self, ch: char) {
        self.chars.insert(self.caret, ch);
        self.caret += 1;
    }

    /// Returns true if the caret moved
    pub fn move_to_start(&mut self) -> bool {
        self.move_to(0)
    }

    pub fn move_to_end(&mut self) -> bool {
        self.move_to(self.chars.len())
    }

    pub fn move_forward(&mut self) -> bool {
        self.move_to((self.caret + 1).min(self.chars.len()))
    }

    pub fn move_backward(&mut self) -> bool {
        self.move_to(self.caret.saturating_sub(1))
    }

    pub fn move_word_forward(&mut self) -> bool {
        self.move_to(self.word_end_after(self.caret))
    }

    pub fn move_word_backward(&mut self) -> bool {
        self.move_to(self.word_start_before(self.caret))
    }

    /// Delete the character under the caret. Returns true if the query changed.
    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.caret);
        true
    }

    /// Delete the character before the caret
    pub fn delete_backward(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        self.chars.remove(self.caret);
        true
    }

    pub fn delete_word_forward(&mut self) -> bool {
        let end = self.word_end_after(self.caret);
        self.delete_range(self.caret, end)
    }

    pub fn delete_word_backward(&mut self) -> bool {
        let start = self.word_start_before(self.caret);
        self.delete_range(start, self.caret)
    }

    /// Delete everything from the caret to the end
    pub fn kill_to_end(&mut self) -> bool {
        self.delete_range(self.caret, self.chars.len())
    }

    /// Delete everything before the caret
    pub fn kill_to_start(&mut self) -> bool {
        self.delete_range(0, self.caret)
    }

    pub fn clear(&mut self) -> bool {
        self.delete_range(0, self.chars.len())
    }

    fn move_to(&mut self, caret: usize) -> bool {
        let moved = caret != self.caret;
        self.caret = caret;
        moved
    }

    fn delete_range(&mut self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        self.chars.drain(start..end);
        self.caret = start;
        true
    }

    /// Skip whitespace, then the run of same-class characters that follows
    fn word_end_after(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.chars.len() && char_type(self.chars[i]) == CharType::Whitespace {
            i += 1;
        }
        if let Some(&ch) = self.chars.get(i) {
            let class = char_type(ch);
            while i < self.chars.len() && char_type(self.chars[i]) == class {
                i += 1;
            }
        }
        i
    }

    fn word_start_before(&self, from: usize) -> usize {
        let mut i = from;
        while i > 0 && char_type(self.chars[i - 1]) == CharType::Whitespace {
            i -= 1;
        }
        if i > 0 {
            let class = char_type(self.chars[i - 1]);
            while i > 0 && char_type(self.chars[i - 1]) == class {
                i -= 1;
            }
        }
        i
    }
}

impl fmt::Display for QueryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
