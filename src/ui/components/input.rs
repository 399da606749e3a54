//! Single-line text input.
//!
//! The cursor is a character index, so multi-byte text (accented names,
//! non-Latin scripts) edits correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// Byte offset of the `char_index`-th character, or the length of `s`.
pub(crate) fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input holding `value`, with the cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = byte_offset(&self.value, self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            (KeyCode::Backspace, _) => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = byte_offset(&self.value, self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Delete, _) => {
                if self.cursor >= self.len() {
                    return false;
                }
                let at = byte_offset(&self.value, self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.cursor = (self.cursor + 1).min(self.len());
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                false
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    return false;
                }
                self.value.clear();
                self.cursor = 0;
                true
            }
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => self.delete_word_before_cursor(),
            _ => false,
        }
    }

    fn delete_word_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && chars[start - 1].is_alphanumeric() {
            start -= 1;
        }
        if start == self.cursor {
            // Punctuation run: remove a single character.
            start -= 1;
        }
        let range = byte_offset(&self.value, start)..byte_offset(&self.value, self.cursor);
        self.value.replace_range(range, "");
        self.cursor = start;
        true
    }

    /// Render the input in a bordered box titled with `label`.
    pub fn render_with_label(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let t = theme();
        let title_style = if focused {
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.label)
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", label), title_style))
            .borders(Borders::ALL)
            .border_style(t.border_style(focused));

        // Keep the cursor in view on narrow boxes.
        let inner_width = area.width.saturating_sub(2) as usize;
        let skip = (self.cursor + 1).saturating_sub(inner_width);
        let visible: String = self.value.chars().skip(skip).collect();

        frame.render_widget(
            Paragraph::new(visible)
                .style(Style::default().fg(t.fg))
                .block(block),
            area,
        );

        if focused && area.width > 2 && area.height > 2 {
            let cursor_x = area.x + 1 + (self.cursor - skip) as u16;
            frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_with_value_puts_cursor_at_end() {
        let input = TextInput::with_value("Ana");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut input = TextInput::with_value("Jose");
        input.handle_input(key(KeyCode::Backspace));
        assert!(input.handle_input(key(KeyCode::Char('é'))));
        assert_eq!(input.value(), "José");

        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.value(), "Joé");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = TextInput::with_value("añb");
        input.handle_input(key(KeyCode::Home));
        input.handle_input(key(KeyCode::Right));
        assert!(input.handle_input(key(KeyCode::Delete)));
        assert_eq!(input.value(), "ab");

        input.handle_input(key(KeyCode::End));
        assert!(!input.handle_input(key(KeyCode::Delete)));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::with_value("ab");
        input.handle_input(key(KeyCode::Right));
        assert_eq!(input.cursor(), 2);
        input.handle_input(ctrl('a'));
        input.handle_input(key(KeyCode::Left));
        assert_eq!(input.cursor(), 0);
        assert!(!input.handle_input(key(KeyCode::Backspace)));
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::with_value("text");
        assert!(input.handle_input(ctrl('u')));
        assert_eq!(input.value(), "");
        assert!(!input.handle_input(ctrl('u')));
    }

    #[test]
    fn test_ctrl_w_deletes_word() {
        let mut input = TextInput::with_value("Senior Engineer");
        assert!(input.handle_input(ctrl('w')));
        assert_eq!(input.value(), "Senior ");
        input.handle_input(ctrl('w'));
        assert_eq!(input.value(), "");
    }
}
