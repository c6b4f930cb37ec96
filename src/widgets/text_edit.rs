//! Editable text with a caret.
//!
//! The caret is a char index, so multi-byte input never splits a code point.

use crate::core::event::{Event, InputState, Key};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    caret: usize,
}

impl TextBuffer {
    /// Buffer holding `text` with the caret at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self { text, caret }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    pub fn insert(&mut self, s: &str) {
        let at = self.byte_at(self.caret);
        self.text.insert_str(at, s);
        self.caret += s.chars().count();
    }

    /// Remove the char before the caret.
    pub fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        let at = self.byte_at(self.caret);
        self.text.remove(at);
        true
    }

    /// Remove the char under the caret.
    pub fn delete(&mut self) -> bool {
        if self.caret >= self.len_chars() {
            return false;
        }
        let at = self.byte_at(self.caret);
        self.text.remove(at);
        true
    }

    pub fn left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.caret = (self.caret + 1).min(self.len_chars());
    }

    pub fn home(&mut self) {
        self.caret = 0;
    }

    pub fn end(&mut self) {
        self.caret = self.len_chars();
    }

    /// Apply an editing event. Returns true when it was consumed.
    pub fn handle(&mut self, event: &Event) -> bool {
        match event {
            Event::TextInput(s) => {
                self.insert(s);
                true
            }
            Event::Key {
                key,
                state: InputState::Pressed,
                ..
            } => match key {
                Key::Backspace => self.backspace(),
                Key::Delete => self.delete(),
                Key::Left => {
                    self.left();
                    true
                }
                Key::Right => {
                    self.right();
                    true
                }
                Key::Home => {
                    self.home();
                    true
                }
                Key::End => {
                    self.end();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Text with `marker` spliced in at the caret.
    pub fn with_caret(&self, marker: char) -> String {
        let at = self.byte_at(self.caret);
        let mut out = String::with_capacity(self.text.len() + marker.len_utf8());
        out.push_str(&self.text[..at]);
        out.push(marker);
        out.push_str(&self.text[at..]);
        out
    }
}
