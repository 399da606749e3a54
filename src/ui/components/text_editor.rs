//! Multi-line text editor for bullet point lists.
//!
//! Columns are character indices into the current line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::input::byte_offset;
use crate::ui::theme::theme;

#[derive(Debug, Clone)]
pub struct TextEditor {
    lines: Vec<String>,
    cursor_line: usize,
    cursor_col: usize,
    /// First visible line.
    scroll: usize,
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextEditor {
    pub fn new(content: &str) -> Self {
        let mut lines: Vec<String> = content.split('\n').map(String::from).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor_line: 0,
            cursor_col: 0,
            scroll: 0,
        }
    }

    /// The content, lines joined with newlines.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines[line].chars().count()
    }

    fn cursor_byte(&self) -> usize {
        byte_offset(&self.lines[self.cursor_line], self.cursor_col)
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the content was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.cursor_byte();
                self.lines[self.cursor_line].insert(at, c);
                self.cursor_col += 1;
                true
            }
            (KeyCode::Enter, _) => {
                let at = self.cursor_byte();
                let rest = self.lines[self.cursor_line].split_off(at);
                self.lines.insert(self.cursor_line + 1, rest);
                self.cursor_line += 1;
                self.cursor_col = 0;
                true
            }
            (KeyCode::Backspace, _) => self.delete_backward(),
            (KeyCode::Delete, _) => self.delete_forward(),
            (KeyCode::Left, KeyModifiers::NONE) => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_line > 0 {
                    self.cursor_line -= 1;
                    self.cursor_col = self.line_len(self.cursor_line);
                }
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                if self.cursor_col < self.line_len(self.cursor_line) {
                    self.cursor_col += 1;
                } else if self.cursor_line + 1 < self.lines.len() {
                    self.cursor_line += 1;
                    self.cursor_col = 0;
                }
                false
            }
            (KeyCode::Up, KeyModifiers::NONE) => {
                if self.cursor_line > 0 {
                    self.cursor_line -= 1;
                    self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_line));
                }
                false
            }
            (KeyCode::Down, KeyModifiers::NONE) => {
                if self.cursor_line + 1 < self.lines.len() {
                    self.cursor_line += 1;
                    self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_line));
                }
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor_col = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor_col = self.line_len(self.cursor_line);
                false
            }
            // Kill to end of line, joining with the next line when already there.
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                if self.cursor_col < self.line_len(self.cursor_line) {
                    let at = self.cursor_byte();
                    self.lines[self.cursor_line].truncate(at);
                    true
                } else {
                    self.delete_forward()
                }
            }
            _ => false,
        }
    }

    fn delete_backward(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = self.cursor_byte();
            self.lines[self.cursor_line].remove(at);
            true
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
            true
        } else {
            false
        }
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor_col < self.line_len(self.cursor_line) {
            let at = self.cursor_byte();
            self.lines[self.cursor_line].remove(at);
            true
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
            true
        } else {
            false
        }
    }

    fn ensure_cursor_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        }
        if self.cursor_line >= self.scroll + visible_height {
            self.scroll = self.cursor_line + 1 - visible_height;
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let t = theme();
        let visible_height = area.height.saturating_sub(2) as usize;
        self.ensure_cursor_visible(visible_height);

        let lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(visible_height)
            .map(|line| Line::from(line.as_str()))
            .collect();

        let title_style = if focused {
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.label)
        };
        let block = Block::default()
            .title(Span::styled(format!(" {} ", label), title_style))
            .borders(Borders::ALL)
            .border_style(t.border_style(focused));

        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(t.fg))
                .block(block),
            area,
        );

        if focused && visible_height > 0 {
            let cursor_x = area.x + 1 + self.cursor_col as u16;
            let cursor_y = area.y + 1 + (self.cursor_line - self.scroll) as u16;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }
    }
}
